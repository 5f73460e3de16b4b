//! Progress reporter
//!
//! The default reporter: one character per result while the run is going,
//! then timing, a numbered detail list of everything that did not pass,
//! and the summary line.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::io::Write;

use super::sink::OutputSink;
use super::summary::{Statistics, Summary};
use super::Reporter;
use crate::models::TestResult;

/// Options that change what the progress reporter prints
#[derive(Clone, Debug, Default)]
pub struct ReporterOptions {
    /// Echo every result on its own line and list skips in the details
    pub verbose: bool,
    /// Reproduction arguments printed in the header, e.g. `--seed 1234`
    pub args: String,
}

struct ProgressState {
    io: OutputSink,
    stats: Statistics,
}

pub struct ProgressReporter {
    options: ReporterOptions,
    state: Mutex<ProgressState>,
}

impl ProgressReporter {
    pub fn new(io: OutputSink, options: ReporterOptions) -> Self {
        Self {
            options,
            state: Mutex::new(ProgressState {
                io,
                stats: Statistics::new(),
            }),
        }
    }

    pub fn count(&self) -> u64 {
        self.state.lock().stats.count()
    }

    pub fn assertions(&self) -> u64 {
        self.state.lock().stats.assertions()
    }

    /// Retained (non-passing) results in arrival order
    pub fn results(&self) -> Vec<TestResult> {
        self.state.lock().stats.results().to_vec()
    }
}

impl Reporter for ProgressReporter {
    fn start(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.stats.start()?;
        let io = &mut state.io;
        writeln!(io, "Run options: {}", self.options.args)?;
        writeln!(io)?;
        writeln!(io, "# Running:")?;
        writeln!(io)?;
        io.flush().context("Failed to flush reporter output")
    }

    fn record(&self, result: &TestResult) -> Result<()> {
        let mut state = self.state.lock();
        state.stats.record(result)?;
        let io = &mut state.io;
        if self.options.verbose {
            writeln!(
                io,
                "{} = {:.2} s = {}",
                result.full_name(),
                result.elapsed_secs,
                result.result_code()
            )?;
        } else {
            write!(io, "{}", result.result_code())?;
        }
        io.flush().context("Failed to flush reporter output")
    }

    fn report(&self) -> Result<Summary> {
        let mut state = self.state.lock();
        let summary = state.stats.summary()?;
        let ProgressState { io, stats } = &mut *state;

        writeln!(io)?;
        writeln!(io)?;
        writeln!(
            io,
            "Finished in {:.6}s, {:.4} runs/s, {:.4} assertions/s.",
            summary.elapsed_secs,
            summary.runs_per_sec(),
            summary.assertions_per_sec()
        )?;

        let shown = stats
            .results()
            .iter()
            .filter(|r| self.options.verbose || !r.skipped());
        for (i, result) in shown.enumerate() {
            writeln!(io, "\n{:3}) {}", i + 1, result)?;
        }

        writeln!(io)?;
        writeln!(io, "{summary}")?;
        io.flush().context("Failed to flush reporter output")?;
        Ok(summary)
    }

    fn passed(&self) -> bool {
        self.state.lock().stats.passed()
    }
}
