//! Metrics module orchestrator.
//!
//! `derived` holds the derived-metrics engine: everything recomputed from
//! the transaction log when the date filter changes. `engine` holds the
//! crate's own operation counters, snapshot-loggable like any other
//! structured event.

mod derived;
mod engine;

pub use derived::{
    derive_metrics, DateRange, DerivedMetrics, StatSummary, TopCountry, Trend, TrendSeries,
};
pub use engine::{EngineMetrics, MetricsSnapshot};
