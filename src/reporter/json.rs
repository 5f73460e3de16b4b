//! JSON reporter
//!
//! Silent while the run is going; writes one JSON document with the summary
//! and every retained result on `report()`.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::Serialize;
use std::io::Write;

use super::sink::OutputSink;
use super::summary::{Statistics, Summary};
use super::Reporter;
use crate::models::TestResult;

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a Summary,
    passed: bool,
    results: &'a [TestResult],
}

pub struct JsonReporter {
    pretty: bool,
    state: Mutex<(OutputSink, Statistics)>,
}

impl JsonReporter {
    pub fn new(io: OutputSink) -> Self {
        Self {
            pretty: false,
            state: Mutex::new((io, Statistics::new())),
        }
    }

    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }
}

impl Reporter for JsonReporter {
    fn start(&self) -> Result<()> {
        self.state.lock().1.start()
    }

    fn record(&self, result: &TestResult) -> Result<()> {
        self.state.lock().1.record(result)
    }

    fn report(&self) -> Result<Summary> {
        let mut state = self.state.lock();
        let (io, stats) = &mut *state;
        let summary = stats.summary()?;
        let report = JsonReport {
            summary: &summary,
            passed: stats.passed(),
            results: stats.results(),
        };

        let written = if self.pretty {
            serde_json::to_writer_pretty(&mut *io, &report)
        } else {
            serde_json::to_writer(&mut *io, &report)
        };
        written.context("Failed to serialize JSON report")?;
        writeln!(io)?;
        io.flush().context("Failed to flush JSON report")?;
        Ok(summary)
    }

    fn passed(&self) -> bool {
        self.state.lock().1.passed()
    }
}
