//! testrig - a parallel-capable unit test runner with a mock engine
//!
//! Units of test methods are registered process-wide, run either serially
//! or through a worker pool, and their results are aggregated by thread-safe
//! reporters into a summary and a pass/fail outcome.
//!
//! ```
//! use std::sync::Arc;
//! use testrig::models::RunnableUnit;
//! use testrig::reporter::{ProgressReporter, ReporterOptions, SharedBuffer};
//! use testrig::runner::{run_all, RunOptions};
//!
//! let unit = RunnableUnit::new("TestMath")
//!     .parallel()
//!     .test("test_add", |t| Ok(t.assert_eq(4, 2 + 2)?));
//!
//! let output = SharedBuffer::new();
//! let reporter = Arc::new(ProgressReporter::new(output.sink(), ReporterOptions::default()));
//! let passed = run_all(&[Arc::new(unit)], reporter, &RunOptions::default()).unwrap();
//!
//! assert!(passed);
//! assert!(output.contents().ends_with("1 runs, 1 assertions, 0 failures, 0 errors, 0 skips\n"));
//! ```

pub mod cli;
pub mod config;
pub mod executor;
pub mod mock;
pub mod models;
pub mod registry;
pub mod reporter;
pub mod runner;
pub mod utils;
