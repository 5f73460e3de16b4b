//! Data models for test execution
//!
//! Runnable units, per-method test contexts, results and failures.

mod failure;
mod result;
mod unit;

pub use failure::{Failure, FailureKind};
pub use result::{TestResult, TestStatus};
pub use test::Test;
pub use unit::{ConcurrencyMode, RunnableUnit, TestFn, TestMethod};
