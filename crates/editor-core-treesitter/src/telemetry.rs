//! Parse timing telemetry.

use std::time::Duration;

/// Which kind of parse produced a timing sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseKind {
    /// A from-scratch parse fed by a buffer snapshot.
    Full,
    /// A re-parse reusing the previous tree after edits.
    Incremental,
}

impl ParseKind {
    /// Short name used in log lines (`fullParse` / `incrementalParse`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Full => "fullParse",
            Self::Incremental => "incrementalParse",
        }
    }

    /// Telemetry event name (`treeSitter.fullParse` / `treeSitter.incrementalParse`).
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Full => "treeSitter.fullParse",
            Self::Incremental => "treeSitter.incrementalParse",
        }
    }
}

/// Payload of a parse timing event.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseTimeEvent {
    /// Language id of the parsed document.
    pub language_id: String,
    /// Elapsed wall time in milliseconds.
    pub time_ms: f64,
}

impl ParseTimeEvent {
    pub(crate) fn new(language_id: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            language_id: language_id.into(),
            time_ms: elapsed.as_secs_f64() * 1000.0,
        }
    }
}

/// Fire-and-forget telemetry sink.
pub trait TelemetrySink: Send + Sync {
    /// Record one event.
    fn log(&self, event_name: &str, event: &ParseTimeEvent);
}

/// Default sink: emits events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn log(&self, event_name: &str, event: &ParseTimeEvent) {
        tracing::debug!(
            target: "editor_core_treesitter::telemetry",
            event = event_name,
            language_id = %event.language_id,
            time_ms = event.time_ms,
            "telemetry"
        );
    }
}
