//! Scenario registry and suite runner
//!
//! The suite enumerates every configured (StorageMode, Kind) pair and runs
//! each applicable scenario against a fresh [`Scaffold`]. One scenario, one
//! scaffold, one transaction scope: nothing survives into the next scenario.
//!
//! Infrastructure failures (the store cannot provide a fixture) are recorded
//! as such, never as contract failures.

use crate::checks;
use crate::report::{Outcome, ReportSink, SuiteSummary};
use crate::scaffold::Scaffold;
use shelf_core::{Kind, StorageMode};
use shelf_store::Store;

/// Which (mode, kind) pairs a scenario applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Applicability {
    /// Every pair
    All,
    /// Kinds with an ordering (min/max/sorted)
    Comparable,
    /// Kinds with an additive identity (sum/average)
    Summable,
    /// Managed mode only, every kind
    ManagedOnly,
}

impl Applicability {
    fn matches(self, mode: StorageMode, kind: Kind) -> bool {
        match self {
            Applicability::All => true,
            Applicability::Comparable => kind.is_comparable(),
            Applicability::Summable => kind.is_summable(),
            Applicability::ManagedOnly => mode.is_managed(),
        }
    }
}

/// One entry in the scenario registry
struct Scenario {
    name: &'static str,
    location: &'static str,
    applies: Applicability,
    run: fn(&Scaffold) -> anyhow::Result<()>,
}

macro_rules! scenario {
    ($name:literal, $applies:expr, $run:path) => {
        Scenario {
            name: $name,
            location: concat!(file!(), ":", line!()),
            applies: $applies,
            run: $run,
        }
    };
}

const SCENARIOS: &[Scenario] = &[
    scenario!(
        "fresh_collection_is_empty",
        Applicability::All,
        checks::fresh_collection_is_empty
    ),
    scenario!(
        "append_index_of_round_trip",
        Applicability::All,
        checks::append_index_of_round_trip
    ),
    scenario!(
        "append_all_positional_stability",
        Applicability::All,
        checks::append_all_positional_stability
    ),
    scenario!(
        "insert_shifts_and_appends",
        Applicability::All,
        checks::insert_shifts_and_appends
    ),
    scenario!("bounds_rejected", Applicability::All, checks::bounds_rejected),
    scenario!(
        "index_of_first_match",
        Applicability::All,
        checks::index_of_first_match
    ),
    scenario!("set_replaces", Applicability::All, checks::set_replaces),
    scenario!(
        "remove_shifts_left",
        Applicability::All,
        checks::remove_shifts_left
    ),
    scenario!("move_and_swap", Applicability::All, checks::move_and_swap),
    scenario!(
        "remove_all_idempotent",
        Applicability::All,
        checks::remove_all_idempotent
    ),
    scenario!(
        "type_mismatch_rejected",
        Applicability::All,
        checks::type_mismatch_rejected
    ),
    scenario!(
        "min_max_extremal",
        Applicability::Comparable,
        checks::min_max_extremal
    ),
    scenario!(
        "sorted_contract",
        Applicability::Comparable,
        checks::sorted_contract
    ),
    scenario!(
        "sum_average_exact",
        Applicability::Summable,
        checks::sum_average_exact
    ),
    scenario!(
        "unknown_property",
        Applicability::ManagedOnly,
        checks::unknown_property
    ),
    scenario!(
        "invalidation_irreversible",
        Applicability::ManagedOnly,
        checks::invalidation_irreversible
    ),
];

/// What to run: which modes, which kinds, and whether to stop on failure
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Storage modes to exercise
    pub modes: Vec<StorageMode>,
    /// Element kinds to exercise
    pub kinds: Vec<Kind>,
    /// Stop after the first non-passing scenario
    pub fail_fast: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            modes: StorageMode::all().to_vec(),
            kinds: Kind::all().to_vec(),
            fail_fast: false,
        }
    }
}

impl SuiteConfig {
    /// Build a config from environment variables
    ///
    /// - `SHELF_CONFORMANCE_MODES`: comma-separated mode names
    /// - `SHELF_CONFORMANCE_KINDS`: comma-separated kind names
    /// - `SHELF_CONFORMANCE_FAIL_FAST`: `1` to stop on first failure
    ///
    /// Unset or empty variables keep the defaults; unknown names are
    /// skipped with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var("SHELF_CONFORMANCE_MODES") {
            let modes = parse_names(&raw, StorageMode::from_name, "mode");
            if !modes.is_empty() {
                config.modes = modes;
            }
        }
        if let Ok(raw) = std::env::var("SHELF_CONFORMANCE_KINDS") {
            let kinds = parse_names(&raw, Kind::from_name, "kind");
            if !kinds.is_empty() {
                config.kinds = kinds;
            }
        }
        if let Ok(raw) = std::env::var("SHELF_CONFORMANCE_FAIL_FAST") {
            config.fail_fast = raw == "1";
        }
        config
    }
}

fn parse_names<T>(raw: &str, parse: fn(&str) -> Option<T>, what: &str) -> Vec<T> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter_map(|name| {
            let parsed = parse(name);
            if parsed.is_none() {
                tracing::warn!(name, "unknown {what} skipped");
            }
            parsed
        })
        .collect()
}

/// The conformance suite: one store, one config, many scenarios
pub struct ContractSuite {
    store: Store,
    config: SuiteConfig,
}

impl ContractSuite {
    /// Suite over a fresh store with the default config
    pub fn new() -> Self {
        Self::with_config(SuiteConfig::default())
    }

    /// Suite over a fresh store with an explicit config
    pub fn with_config(config: SuiteConfig) -> Self {
        Self {
            store: Store::new(),
            config,
        }
    }

    /// The store scenarios run against
    ///
    /// Exposed so callers can assert that a full run leaves it untouched.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Run every applicable scenario, reporting each outcome to `sink`
    pub fn run(&self, sink: &mut dyn ReportSink) -> SuiteSummary {
        let mut summary = SuiteSummary::default();
        'run: for &mode in &self.config.modes {
            for &kind in &self.config.kinds {
                for scenario in SCENARIOS {
                    if !scenario.applies.matches(mode, kind) {
                        continue;
                    }
                    let outcome = self.run_scenario(scenario, mode, kind);
                    sink.record(&outcome);
                    summary.observe(&outcome);
                    if !outcome.passed && self.config.fail_fast {
                        break 'run;
                    }
                }
            }
        }
        tracing::info!(%summary, "conformance run finished");
        summary
    }

    fn run_scenario(&self, scenario: &Scenario, mode: StorageMode, kind: Kind) -> Outcome {
        tracing::debug!(scenario = scenario.name, %mode, %kind, "scenario start");
        let base = |passed: bool, message: Option<String>, infrastructure: bool| Outcome {
            scenario: scenario.name.to_string(),
            mode,
            kind,
            passed,
            message,
            location: scenario.location,
            infrastructure,
        };

        match Scaffold::new(&self.store, mode, kind) {
            Err(e) => base(false, Some(e.to_string()), true),
            Ok(scaffold) => {
                let result = (scenario.run)(&scaffold);
                // scaffold drops here; the transaction rolls back
                match result {
                    Ok(()) => base(true, None, false),
                    Err(e) => base(false, Some(format!("{e:#}")), false),
                }
            }
        }
    }
}

impl Default for ContractSuite {
    fn default() -> Self {
        Self::new()
    }
}
