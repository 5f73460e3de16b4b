//! Run statistics and summaries

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::models::{FailureKind, TestResult};
use crate::utils::timer::rate;

/// Aggregate numbers of a finished run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub runs: u64,
    pub assertions: u64,
    pub failures: usize,
    pub errors: usize,
    pub skips: usize,
    pub elapsed_secs: f64,
    pub started_at: Option<DateTime<Utc>>,
}

impl Summary {
    pub fn runs_per_sec(&self) -> f64 {
        rate(self.runs, self.elapsed_secs)
    }

    pub fn assertions_per_sec(&self) -> f64 {
        rate(self.assertions, self.elapsed_secs)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} runs, {} assertions, {} failures, {} errors, {} skips",
            self.runs, self.assertions, self.failures, self.errors, self.skips
        )
    }
}

/// Bookkeeping shared by every reporter implementation.
///
/// Callers own the lock; nothing in here is synchronised.
#[derive(Debug, Default)]
pub struct Statistics {
    count: u64,
    assertions: u64,
    results: Vec<TestResult>,
    start: Option<Instant>,
    started_at: Option<DateTime<Utc>>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) -> Result<()> {
        if self.start.is_some() {
            bail!("reporter started twice");
        }
        self.start = Some(Instant::now());
        self.started_at = Some(Utc::now());
        Ok(())
    }

    /// Count a result and retain it unless it is a clean pass
    pub fn record(&mut self, result: &TestResult) -> Result<()> {
        if self.start.is_none() {
            bail!("result {} recorded before start", result.full_name());
        }
        self.count += 1;
        self.assertions += result.assertions;
        if !result.passed() {
            self.results.push(result.clone());
        }
        Ok(())
    }

    pub fn summary(&self) -> Result<Summary> {
        let Some(start) = self.start else {
            bail!("reporter reported before start");
        };

        let by_kind = |kind: FailureKind| self.results.iter().filter(|r| r.kind() == Some(kind)).count();

        Ok(Summary {
            runs: self.count,
            assertions: self.assertions,
            failures: by_kind(FailureKind::Assertion),
            errors: by_kind(FailureKind::UnexpectedError),
            skips: by_kind(FailureKind::Skip),
            elapsed_secs: start.elapsed().as_secs_f64(),
            started_at: self.started_at,
        })
    }

    /// True when every retained result is a skip
    pub fn passed(&self) -> bool {
        self.results.iter().all(TestResult::skipped)
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn assertions(&self) -> u64 {
        self.assertions
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Failure;

    fn result(failure: Option<Failure>, assertions: u64) -> TestResult {
        TestResult::new("TestA", "test_x", assertions, failure, 0.01)
    }

    #[test]
    fn test_summary_line() {
        let summary = Summary {
            runs: 4,
            assertions: 4,
            failures: 1,
            ..Default::default()
        };
        assert_eq!(summary.to_string(), "4 runs, 4 assertions, 1 failures, 0 errors, 0 skips");
    }

    #[test]
    fn test_record_requires_start() {
        let mut stats = Statistics::new();
        assert!(stats.record(&result(None, 1)).is_err());
        assert!(stats.summary().is_err());
        stats.start().unwrap();
        assert!(stats.start().is_err());
        assert!(stats.record(&result(None, 1)).is_ok());
    }

    #[test]
    fn test_retains_only_non_passing() {
        let mut stats = Statistics::new();
        stats.start().unwrap();
        stats.record(&result(None, 2)).unwrap();
        stats.record(&result(Some(Failure::skip("later")), 0)).unwrap();
        stats.record(&result(Some(Failure::assertion("bad")), 1)).unwrap();

        assert_eq!(stats.count(), 3);
        assert_eq!(stats.assertions(), 3);
        assert_eq!(stats.results().len(), 2);

        let summary = stats.summary().unwrap();
        assert_eq!((summary.failures, summary.errors, summary.skips), (1, 0, 1));
        assert!(!stats.passed());
    }

    #[test]
    fn test_skip_only_run_passes() {
        let mut stats = Statistics::new();
        stats.start().unwrap();
        stats.record(&result(Some(Failure::skip("later")), 0)).unwrap();
        assert!(stats.passed());
        assert_eq!(stats.summary().unwrap().skips, 1);
    }
}
