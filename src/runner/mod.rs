//! Run orchestration
//!
//! Splits the units into parallel and serial groups, pushes the parallel
//! ones through one shared executor and waits for it to drain. The serial
//! ones then run in place, never alongside a parallel method, and only
//! after both groups does the reporter report.

mod options;

pub use options::RunOptions;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

use crate::executor::{self, run_one_method, Job};
use crate::models::RunnableUnit;
use crate::registry::{self, Filter};
use crate::reporter::{self, CompositeReporter, ProgressReporter, Reporter, ReporterOptions, Summary};

/// Outcome of a finished run
#[derive(Clone, Debug, PartialEq)]
pub struct RunOutcome {
    pub passed: bool,
    pub summary: Summary,
}

/// Run `units` against `reporter` and return whether the run passed
pub fn run_all(units: &[Arc<RunnableUnit>], reporter: Arc<dyn Reporter>, options: &RunOptions) -> Result<bool> {
    Ok(execute(units, reporter, options)?.passed)
}

fn execute(units: &[Arc<RunnableUnit>], reporter: Arc<dyn Reporter>, options: &RunOptions) -> Result<RunOutcome> {
    reporter.start().context("Failed to start reporter")?;

    let mut rng = options.seed.map(StdRng::seed_from_u64);
    let (parallel, serial): (Vec<_>, Vec<_>) = units.iter().partition(|u| u.is_parallel());
    info!(
        "Running {} parallel and {} serial units ({} x{})",
        parallel.len(),
        serial.len(),
        options.executor,
        options.workers
    );

    let mut pool = executor::build(options.executor, options.workers).context("Failed to start executor")?;
    for unit in parallel {
        for method in ordered_methods(unit, &options.filter, rng.as_mut()) {
            pool.submit(Job::new(Arc::clone(unit), method, Arc::clone(&reporter)))?;
        }
    }
    pool.shutdown().context("Parallel workers did not finish cleanly")?;

    for unit in serial {
        for method in ordered_methods(unit, &options.filter, rng.as_mut()) {
            let result = run_one_method(unit, &method);
            reporter
                .record(&result)
                .with_context(|| format!("Failed to record {}", result.full_name()))?;
        }
    }

    let summary = reporter.report().context("Failed to write report")?;
    let passed = reporter.passed();
    info!("Run finished: {} (passed: {})", summary, passed);
    Ok(RunOutcome { passed, summary })
}

/// Filtered method names of `unit`, shuffled when a seeded rng is given
fn ordered_methods(unit: &RunnableUnit, filter: &Filter, rng: Option<&mut StdRng>) -> Vec<String> {
    let mut methods = unit.methods_matching(filter);
    if let Some(rng) = rng {
        methods.shuffle(rng);
    }
    debug!("{}: {} methods selected", unit.name(), methods.len());
    methods
}

/// Drives runs with a configured set of reporters
pub struct TestRunner {
    options: RunOptions,
    reporters: Vec<Arc<dyn Reporter>>,
}

impl TestRunner {
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            reporters: Vec::new(),
        }
    }

    /// Add a reporter. Without any, results go to a progress reporter on stdout.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporters.push(reporter);
        self
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    fn reporter(&self) -> Arc<dyn Reporter> {
        if self.reporters.is_empty() {
            let options = ReporterOptions {
                verbose: self.options.verbose,
                args: self.options.args(),
            };
            return Arc::new(ProgressReporter::new(reporter::stdout(), options));
        }
        Arc::new(CompositeReporter::new(self.reporters.clone()))
    }

    /// Run the given units
    pub fn run_units(&self, units: &[Arc<RunnableUnit>]) -> Result<RunOutcome> {
        execute(units, self.reporter(), &self.options)
    }

    /// Run every registered unit, then the after-run hooks, newest first
    pub fn run(&self) -> Result<RunOutcome> {
        let units = registry::all_units();
        let outcome = self.run_units(&units);
        for hook in registry::take_after_run() {
            hook();
        }
        outcome
    }
}

/// Process exit status for a run
pub fn exit_code(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
