//! Test result models
//!
//! Defines the outcome record of one executed test method.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::failure::{Failure, FailureKind};

/// Terminal state of a test method
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Skip,
    Fail,
    Error,
}

impl TestStatus {
    pub fn symbol(&self) -> char {
        match self {
            TestStatus::Pass => '.',
            TestStatus::Skip => 'S',
            TestStatus::Fail => 'F',
            TestStatus::Error => 'E',
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "PASS"),
            TestStatus::Skip => write!(f, "SKIP"),
            TestStatus::Fail => write!(f, "FAIL"),
            TestStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of a single test method execution
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub unit: String,
    pub method: String,
    pub assertions: u64,
    pub failure: Option<Failure>,
    pub elapsed_secs: f64,
}

impl TestResult {
    pub fn new(
        unit: impl Into<String>,
        method: impl Into<String>,
        assertions: u64,
        failure: Option<Failure>,
        elapsed_secs: f64,
    ) -> Self {
        Self {
            unit: unit.into(),
            method: method.into(),
            assertions,
            failure,
            elapsed_secs: elapsed_secs.max(0.0),
        }
    }

    pub fn pass(unit: impl Into<String>, method: impl Into<String>, assertions: u64) -> Self {
        Self::new(unit, method, assertions, None, 0.0)
    }

    pub fn with_failure(mut self, failure: Failure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn with_elapsed(mut self, elapsed_secs: f64) -> Self {
        self.elapsed_secs = elapsed_secs.max(0.0);
        self
    }

    /// `Unit#method`
    pub fn full_name(&self) -> String {
        format!("{}#{}", self.unit, self.method)
    }

    /// True only for a clean pass. Skips are not passes.
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }

    pub fn skipped(&self) -> bool {
        self.failure.as_ref().is_some_and(Failure::is_skip)
    }

    pub fn kind(&self) -> Option<FailureKind> {
        self.failure.as_ref().map(|f| f.kind)
    }

    pub fn status(&self) -> TestStatus {
        match self.kind() {
            None => TestStatus::Pass,
            Some(FailureKind::Skip) => TestStatus::Skip,
            Some(FailureKind::Assertion) => TestStatus::Fail,
            Some(FailureKind::UnexpectedError) => TestStatus::Error,
        }
    }

    /// Progress character: `.`, `F`, `S` or `E`
    pub fn result_code(&self) -> char {
        self.status().symbol()
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(failure) = &self.failure else {
            return write!(f, "{} [{:.2}s]", self.full_name(), self.elapsed_secs);
        };

        write!(f, "{}:\n{}", failure.label(), self.full_name())?;
        if let Some(location) = &failure.location {
            write!(f, " [{location}]")?;
        }
        write!(f, ":\n{}", failure.message)?;
        if let Some(cause) = &failure.cause {
            write!(f, "\n    {cause}")?;
        }
        Ok(())
    }
}
