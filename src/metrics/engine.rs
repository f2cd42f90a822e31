use serde_json::json;

use crate::logging::{LogEvent, LogFields, LogLevel};

/// Operation counters for the dashboard core.
#[derive(Debug, Default, Clone)]
pub struct EngineMetrics {
    reorders: u64,
    resize_steps: u64,
    resize_rejected: u64,
    recomputes: u64,
    saves: u64,
    loads: u64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_reorder(&mut self) {
        self.reorders = self.reorders.saturating_add(1);
    }

    pub fn record_resize_step(&mut self, rejected: bool) {
        self.resize_steps = self.resize_steps.saturating_add(1);
        if rejected {
            self.resize_rejected = self.resize_rejected.saturating_add(1);
        }
    }

    pub fn record_recompute(&mut self) {
        self.recomputes = self.recomputes.saturating_add(1);
    }

    pub fn record_save(&mut self) {
        self.saves = self.saves.saturating_add(1);
    }

    pub fn record_load(&mut self) {
        self.loads = self.loads.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            reorders: self.reorders,
            resize_steps: self.resize_steps,
            resize_rejected: self.resize_rejected,
            recomputes: self.recomputes,
            saves: self.saves,
            loads: self.loads,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub reorders: u64,
    pub resize_steps: u64,
    pub resize_rejected: u64,
    pub recomputes: u64,
    pub saves: u64,
    pub loads: u64,
}

impl MetricsSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        let mut fields = LogFields::new();
        fields.insert("reorders".to_string(), json!(self.reorders));
        fields.insert("resize_steps".to_string(), json!(self.resize_steps));
        fields.insert("resize_rejected".to_string(), json!(self.resize_rejected));
        fields.insert("recomputes".to_string(), json!(self.recomputes));
        fields.insert("saves".to_string(), json!(self.saves));
        fields.insert("loads".to_string(), json!(self.loads));
        LogEvent::with_fields(LogLevel::Info, target, "engine_metrics", fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let mut metrics = EngineMetrics::new();
        metrics.record_reorder();
        metrics.record_resize_step(false);
        metrics.record_resize_step(true);
        metrics.record_recompute();
        metrics.record_save();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.reorders, 1);
        assert_eq!(snapshot.resize_steps, 2);
        assert_eq!(snapshot.resize_rejected, 1);
        assert_eq!(snapshot.recomputes, 1);
        assert_eq!(snapshot.saves, 1);
        assert_eq!(snapshot.loads, 0);
    }

    #[test]
    fn snapshot_converts_to_log_event() {
        let mut metrics = EngineMetrics::new();
        metrics.record_recompute();
        let event = metrics.snapshot().to_log_event("dash::metrics");
        assert_eq!(event.message, "engine_metrics");
        assert_eq!(event.fields["recomputes"], json!(1));
    }
}
