//! Conformance runner
//!
//! Runs the full contract suite against a fresh store and exits nonzero
//! unless every scenario passes. Configuration comes from the environment:
//!
//! - `SHELF_CONFORMANCE_MODES` / `SHELF_CONFORMANCE_KINDS`: narrow the matrix
//! - `SHELF_CONFORMANCE_FAIL_FAST=1`: stop at the first failure
//! - `SHELF_CONFORMANCE_JSON=1`: one JSON line per outcome on stdout
//! - `RUST_LOG`: tracing filter (defaults to `info`)

use shelf_conformance::{ConsoleSink, ContractSuite, JsonSink, SuiteConfig, SuiteSummary};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let suite = ContractSuite::with_config(SuiteConfig::from_env());
    let json = std::env::var("SHELF_CONFORMANCE_JSON").is_ok_and(|v| v == "1");

    let summary: SuiteSummary = if json {
        let mut sink = JsonSink::new(std::io::stdout().lock());
        suite.run(&mut sink)
    } else {
        let mut sink = ConsoleSink;
        suite.run(&mut sink)
    };

    println!("{summary}");
    if !summary.is_success() {
        std::process::exit(1);
    }
}
