use crate::events::{DiagnosticEvent, LogLevel};
use std::sync::Mutex;

/// Receives diagnostic events from the engine.
///
/// Engine operations take `&dyn DiagnosticsSink` so callers decide where anomalies go.
pub trait DiagnosticsSink: Send + Sync {
    fn record(&self, event: DiagnosticEvent);
}

/// Forwards events to the `tracing` facade at their own severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&self, event: DiagnosticEvent) {
        match event.level() {
            LogLevel::Warn => tracing::warn!(target: "market_lens::diagnostics", "{}", event),
            LogLevel::Info => tracing::info!(target: "market_lens::diagnostics", "{}", event),
            LogLevel::Debug => tracing::debug!(target: "market_lens::diagnostics", "{}", event),
        }
    }
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&self, _event: DiagnosticEvent) {}
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything recorded so far.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    pub fn structural_anomalies(&self) -> Vec<DiagnosticEvent> {
        self.events().into_iter().filter(DiagnosticEvent::is_structural).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().map(|events| events.is_empty()).unwrap_or(true)
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().map(|mut events| std::mem::take(&mut *events)).unwrap_or_default()
    }
}

impl DiagnosticsSink for MemorySink {
    fn record(&self, event: DiagnosticEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Sends each event to two sinks, e.g. a `MemorySink` for a report plus a `TracingSink`.
pub struct Tee<'a> {
    first: &'a dyn DiagnosticsSink,
    second: &'a dyn DiagnosticsSink,
}

impl<'a> Tee<'a> {
    pub fn new(first: &'a dyn DiagnosticsSink, second: &'a dyn DiagnosticsSink) -> Self {
        Self { first, second }
    }
}

impl DiagnosticsSink for Tee<'_> {
    fn record(&self, event: DiagnosticEvent) {
        self.first.record(event.clone());
        self.second.record(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ExclusionReason;

    #[test]
    fn memory_sink_keeps_order_and_drains() {
        let sink = MemorySink::new();
        sink.record(DiagnosticEvent::SharedDescendant { root: "R".into(), node: "N".into() });
        sink.record(DiagnosticEvent::UnitExcluded {
            segment: "S".into(),
            reason: ExclusionReason::NonPositiveBase,
        });
        assert_eq!(sink.events().len(), 2);
        assert_eq!(sink.structural_anomalies().len(), 1);
        assert_eq!(sink.drain().len(), 2);
        assert!(sink.is_empty());
    }

    #[test]
    fn tee_feeds_both_sinks() {
        let left = MemorySink::new();
        let right = MemorySink::new();
        let tee = Tee::new(&left, &right);
        tee.record(DiagnosticEvent::FilterApplied {
            input: 3,
            output: 1,
            advanced: false,
            suppressed_by_parent: 0,
        });
        assert_eq!(left.events(), right.events());
        TracingSink.record(left.events()[0].clone());
    }
}
