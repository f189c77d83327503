//! Contract conformance suite for the Shelf list primitive
//!
//! The suite drives one behavioral contract across every configured
//! (StorageMode, Kind) pair:
//! - Scaffold: per-scenario fixture with guaranteed transaction rollback
//! - ContractSuite: scenario registry and runner
//! - ReportSink: where outcomes go (console, JSON lines, or collected)
//!
//! The `conformance` binary wraps the suite for CI: it exits nonzero unless
//! every scenario passes.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod checks;
mod report;
mod scaffold;
mod suite;

pub use report::{CollectingSink, ConsoleSink, JsonSink, Outcome, ReportSink, SuiteSummary};
pub use scaffold::Scaffold;
pub use suite::{ContractSuite, SuiteConfig};
