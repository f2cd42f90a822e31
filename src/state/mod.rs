//! Dashboard state owner.
//!
//! `Dashboard` is the single owner of the layout, the filter, and the
//! transaction log. The presentation layer reads through the accessors and
//! mutates only through the named entry points here; every gesture callback
//! lands on `&mut self`, so there is no concurrent mutation to guard
//! against.

use chrono::{Local, NaiveDate};
use serde_json::json;

use crate::data::{DataSource, TransactionRecord};
use crate::error::Result;
use crate::grid::LayoutState;
use crate::logging::{kv, LogEvent, LogLevel, Logger};
use crate::metrics::{derive_metrics, DateRange, DerivedMetrics, EngineMetrics, MetricsSnapshot};
use crate::mutate::{self, ResizeEdge, ResizeOutcome, ResizeSession};
use crate::persist::{KvStore, LayoutGateway};
use crate::table::{export_csv, TablePage, TableQuery};

const LOG_TARGET: &str = "dash::state";

/// Transient confirmation surfaced to the user after a successful layout
/// save or reset. Failures are silent by design; no notice is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Construction knobs for [`Dashboard`].
#[derive(Clone, Default)]
pub struct DashboardConfig {
    /// Structured logger shared with the persistence gateway.
    pub logger: Option<Logger>,
    /// Fixed anchor for "today". `None` uses the local calendar date;
    /// tests inject a date for deterministic derivation.
    pub today: Option<NaiveDate>,
}

pub struct Dashboard<S: KvStore> {
    records: Vec<TransactionRecord>,
    layout: LayoutState,
    range: DateRange,
    derived: DerivedMetrics,
    gateway: LayoutGateway<S>,
    resize: Option<ResizeSession>,
    metrics: EngineMetrics,
    logger: Option<Logger>,
    today: Option<NaiveDate>,
}

impl<S: KvStore> Dashboard<S> {
    /// Fetch the record set, restore the persisted layout (default
    /// fallback), and derive the initial metrics.
    pub fn new(source: &dyn DataSource, store: S, config: DashboardConfig) -> Result<Self> {
        let records = source.fetch()?;
        let mut gateway = LayoutGateway::new(store);
        if let Some(logger) = config.logger.clone() {
            gateway = gateway.with_logger(logger);
        }

        let mut metrics = EngineMetrics::new();
        let layout = match gateway.load() {
            Some(layout) => {
                metrics.record_load();
                layout
            }
            None => LayoutState::default_layout(),
        };

        let range = DateRange::default();
        let today = config.today;
        let derived = derive_metrics(
            &records,
            range,
            today.unwrap_or_else(|| Local::now().date_naive()),
        );
        metrics.record_recompute();

        let dashboard = Self {
            records,
            layout,
            range,
            derived,
            gateway,
            resize: None,
            metrics,
            logger: config.logger,
            today,
        };
        dashboard.log(
            LogLevel::Info,
            "dashboard_ready",
            [
                kv("widgets", json!(dashboard.layout.len())),
                kv("records", json!(dashboard.records.len())),
            ],
        );
        Ok(dashboard)
    }

    pub fn layout(&self) -> &LayoutState {
        &self.layout
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn derived(&self) -> &DerivedMetrics {
        &self.derived
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Records inside the current trailing window, in log order.
    pub fn filtered_records(&self) -> Vec<TransactionRecord> {
        let today = self.today();
        self.records
            .iter()
            .filter(|r| self.range.contains(today, r.date))
            .cloned()
            .collect()
    }

    /// The table widget's visible page over the filtered window.
    pub fn visible_rows(&self, query: &TableQuery) -> TablePage {
        query.apply(&self.filtered_records())
    }

    /// CSV rendition of the filtered window for download.
    pub fn export_filtered_csv(&self) -> String {
        let rows = self.filtered_records();
        if rows.is_empty() {
            self.log(LogLevel::Warn, "export_empty", []);
        }
        export_csv(&rows)
    }

    /// Switch the trailing window and synchronously re-derive every metric.
    pub fn set_date_range(&mut self, range: DateRange) {
        self.range = range;
        self.derived = derive_metrics(&self.records, range, self.today());
        self.metrics.record_recompute();
        self.log(
            LogLevel::Info,
            "filter_changed",
            [kv("days", json!(range.days()))],
        );
    }

    /// Move a widget within its row's left-to-right order. Out-of-range
    /// positions are a no-op.
    pub fn reorder(&mut self, row: u8, from: usize, to: usize) {
        mutate::reorder(&mut self.layout, row, from, to);
        self.metrics.record_reorder();
        self.log(
            LogLevel::Debug,
            "widgets_reordered",
            [
                kv("row", json!(row)),
                kv("from", json!(from)),
                kv("to", json!(to)),
            ],
        );
    }

    /// Give every widget in each row an equal share of the columns.
    pub fn equalize(&mut self) {
        mutate::equalize(&mut self.layout);
        self.log(LogLevel::Debug, "widgets_equalized", []);
    }

    /// Open a resize gesture. A still-open previous gesture is discarded;
    /// starting on an unknown widget leaves no session behind. Returns
    /// whether a session is now live.
    pub fn begin_resize(&mut self, widget_id: &str, edge: ResizeEdge, container_width: f64) -> bool {
        self.resize = ResizeSession::begin(&self.layout, widget_id, edge, container_width);
        self.resize.is_some()
    }

    /// Feed one pointer sample into the live gesture. `delta_px` is the
    /// cumulative displacement since gesture start. Returns `None` when no
    /// gesture is live.
    pub fn resize_to(&mut self, delta_px: f64) -> Option<ResizeOutcome> {
        let session = self.resize.as_ref()?;
        let outcome = session.apply(&mut self.layout, delta_px);
        self.metrics
            .record_resize_step(outcome == ResizeOutcome::Rejected);
        if outcome == ResizeOutcome::Rejected {
            self.log(
                LogLevel::Debug,
                "resize_step_rejected",
                [kv("widget", json!(session.widget_id()))],
            );
        }
        Some(outcome)
    }

    /// Close the resize gesture. The session is consumed on every exit
    /// path, including a release that never moved the pointer. With
    /// `persist` the committed layout is also saved.
    pub fn end_resize(&mut self, persist: bool) -> Option<Notice> {
        let _session = self.resize.take();
        if persist { self.save_layout() } else { None }
    }

    /// Persist the current layout. Success returns a transient notice;
    /// failure is logged and absorbed.
    pub fn save_layout(&mut self) -> Option<Notice> {
        match self.gateway.save(&self.layout) {
            Ok(()) => {
                self.metrics.record_save();
                Some(Notice::new("Layout saved successfully!"))
            }
            Err(err) => {
                self.log(
                    LogLevel::Warn,
                    "layout_save_failed",
                    [kv("error", json!(err.to_string()))],
                );
                None
            }
        }
    }

    /// Drop the stored blob and revert to the hard-coded default layout.
    /// The in-memory layout reverts even when the delete fails.
    pub fn reset_layout(&mut self) -> Option<Notice> {
        self.layout = LayoutState::default_layout();
        match self.gateway.reset() {
            Ok(()) => Some(Notice::new("Layout reset to default!")),
            Err(err) => {
                self.log(
                    LogLevel::Warn,
                    "layout_reset_failed",
                    [kv("error", json!(err.to_string()))],
                );
                None
            }
        }
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.logger.as_ref() {
            let _ = logger.log_event(LogEvent::with_fields(level, LOG_TARGET, message, fields));
        }
    }
}
