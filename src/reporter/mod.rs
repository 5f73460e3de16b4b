//! Result reporting
//!
//! Reporters aggregate [`TestResult`]s into run statistics and print them.
//! Every method takes `&self`: each implementation keeps its state behind a
//! single mutex, so one reporter can be shared by all worker threads and
//! concurrent `record` calls serialise on that lock.

mod composite;
mod json;
mod progress;
mod sink;
mod summary;

pub use composite::CompositeReporter;
pub use json::JsonReporter;
pub use progress::{ProgressReporter, ReporterOptions};
pub use sink::{stdout, OutputSink, SharedBuffer};
pub use summary::{Statistics, Summary};

use anyhow::Result;

use crate::models::TestResult;

/// Collects and reports the results of a run
pub trait Reporter: Send + Sync {
    /// Begin the run. Must be called once, before any `record`.
    fn start(&self) -> Result<()>;

    /// Count one result, retaining it unless it passed cleanly
    fn record(&self, result: &TestResult) -> Result<()>;

    /// Finish the run and return its summary
    fn report(&self) -> Result<Summary>;

    /// True when no retained result is a failure or an error
    fn passed(&self) -> bool;
}
