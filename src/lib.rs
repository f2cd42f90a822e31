//! Dashboard state core: widget grid layout, mutation engine, layout
//! persistence, and derived sales metrics.
//!
//! Rendering, gesture detection, and data transport live outside this
//! crate; it owns the model those layers read and the entry points they
//! mutate through.

pub mod data;
pub mod error;
pub mod grid;
pub mod logging;
pub mod metrics;
pub mod mutate;
pub mod persist;
pub mod state;
pub mod table;

pub use data::{DataSource, StaticDataSource, TransactionRecord, TxStatus};
pub use error::{DashboardError, Result};
pub use grid::{
    ChartVariant, LayoutState, WidgetKind, WidgetPlacement, GRID_COLS, GRID_ROWS, MAX_SPAN,
    MIN_SPAN,
};
pub use logging::{
    kv, FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, NullSink,
};
pub use metrics::{
    derive_metrics, DateRange, DerivedMetrics, EngineMetrics, MetricsSnapshot, StatSummary,
    TopCountry, Trend, TrendSeries,
};
pub use mutate::{equalize, reorder, ResizeEdge, ResizeOutcome, ResizeSession};
pub use persist::{FileStore, KvStore, LayoutGateway, MemoryStore, LAYOUT_KEY};
pub use state::{Dashboard, DashboardConfig, Notice};
pub use table::{export_csv, SortDirection, TableColumn, TablePage, TableQuery};
