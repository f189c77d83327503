//! Scenario outcomes and reporting sinks
//!
//! The suite pushes one [`Outcome`] per executed scenario into a
//! [`ReportSink`]. Sinks are the seam for whatever runner invokes the
//! suite: human-readable logging, machine-readable JSON lines, or plain
//! collection for assertions in tests.

use serde::Serialize;
use shelf_core::{Kind, StorageMode};
use std::fmt;
use std::io::Write;

/// Result of one scenario against one (mode, kind) pair
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    /// Scenario name from the registry
    pub scenario: String,
    /// Storage mode the scenario ran under
    pub mode: StorageMode,
    /// Element kind the scenario ran under
    pub kind: Kind,
    /// Whether every check in the scenario held
    pub passed: bool,
    /// Failure diagnostic, None on pass
    pub message: Option<String>,
    /// Source location of the scenario definition
    pub location: &'static str,
    /// True when the failure was the harness itself (e.g. the store could
    /// not open a transaction), as opposed to a contract violation
    pub infrastructure: bool,
}

/// Receiver for scenario outcomes
pub trait ReportSink {
    /// Record one outcome; called once per executed scenario
    fn record(&mut self, outcome: &Outcome);
}

/// Sink that logs outcomes through `tracing`
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn record(&mut self, outcome: &Outcome) {
        if outcome.passed {
            tracing::info!(
                scenario = %outcome.scenario,
                mode = %outcome.mode,
                kind = %outcome.kind,
                "pass"
            );
        } else if outcome.infrastructure {
            tracing::error!(
                scenario = %outcome.scenario,
                mode = %outcome.mode,
                kind = %outcome.kind,
                message = outcome.message.as_deref().unwrap_or(""),
                "infrastructure failure"
            );
        } else {
            tracing::error!(
                scenario = %outcome.scenario,
                mode = %outcome.mode,
                kind = %outcome.kind,
                message = outcome.message.as_deref().unwrap_or(""),
                location = outcome.location,
                "FAIL"
            );
        }
    }
}

/// Sink that writes one JSON object per line
pub struct JsonSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn record(&mut self, outcome: &Outcome) {
        match serde_json::to_string(outcome) {
            Ok(line) => {
                if let Err(e) = writeln!(self.writer, "{line}") {
                    tracing::warn!(error = %e, "json sink write failed");
                }
            }
            Err(e) => tracing::warn!(error = %e, "outcome serialization failed"),
        }
    }
}

/// Sink that keeps every outcome for later inspection
#[derive(Debug, Default)]
pub struct CollectingSink {
    outcomes: Vec<Outcome>,
}

impl CollectingSink {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded outcome, in execution order
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Outcomes that did not pass
    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}

impl ReportSink for CollectingSink {
    fn record(&mut self, outcome: &Outcome) {
        self.outcomes.push(outcome.clone());
    }
}

/// Aggregate counts for a full suite run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SuiteSummary {
    /// Scenarios executed
    pub total: usize,
    /// Scenarios in which every check held
    pub passed: usize,
    /// Contract failures
    pub failed: usize,
    /// Harness failures (store could not provide a fixture)
    pub infrastructure: usize,
}

impl SuiteSummary {
    /// Fold one outcome into the counts
    pub fn observe(&mut self, outcome: &Outcome) {
        self.total += 1;
        if outcome.passed {
            self.passed += 1;
        } else if outcome.infrastructure {
            self.infrastructure += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Whether the whole run passed
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.infrastructure == 0
    }
}

impl fmt::Display for SuiteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} scenarios: {} passed, {} failed, {} infrastructure",
            self.total, self.passed, self.failed, self.infrastructure
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(passed: bool, infrastructure: bool) -> Outcome {
        Outcome {
            scenario: "sample".to_string(),
            mode: StorageMode::Transient,
            kind: Kind::Int64,
            passed,
            message: (!passed).then(|| "boom".to_string()),
            location: "here",
            infrastructure,
        }
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = SuiteSummary::default();
        summary.observe(&outcome(true, false));
        summary.observe(&outcome(false, false));
        summary.observe(&outcome(false, true));
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.infrastructure, 1);
        assert!(!summary.is_success());
    }

    #[test]
    fn test_all_passed_is_success() {
        let mut summary = SuiteSummary::default();
        summary.observe(&outcome(true, false));
        assert!(summary.is_success());
        assert_eq!(summary.to_string(), "1 scenarios: 1 passed, 0 failed, 0 infrastructure");
    }

    #[test]
    fn test_collecting_sink_keeps_order() {
        let mut sink = CollectingSink::new();
        sink.record(&outcome(true, false));
        sink.record(&outcome(false, false));
        assert_eq!(sink.outcomes().len(), 2);
        assert_eq!(sink.failures().count(), 1);
    }

    #[test]
    fn test_json_sink_emits_one_line_per_outcome() {
        let mut buffer = Vec::new();
        {
            let mut sink = JsonSink::new(&mut buffer);
            sink.record(&outcome(true, false));
            sink.record(&outcome(false, true));
        }
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text.lines().count(), 2);
        let parsed: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(parsed["scenario"], "sample");
        assert_eq!(parsed["passed"], true);
    }
}
