use thiserror::Error;

/// Unified result type for the dashboard core.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Errors surfaced by the dashboard boundaries.
///
/// Layout mutation never produces one of these; malformed mutation targets
/// degrade to no-ops at the call site. The variants cover the persistence
/// and data-source boundaries, where real I/O can fail.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("widget `{0}` not found")]
    WidgetNotFound(String),
    #[error("storage backend error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
