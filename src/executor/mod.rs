//! Test execution backends
//!
//! An executor takes jobs (one test method of one unit plus the reporter to
//! feed) and runs them. `shutdown()` is the barrier: when it returns, every
//! submitted job has been recorded.

mod error;
mod method;
mod serial;
mod task;
mod thread;

pub use error::ExecutorError;
pub use method::run_one_method;
pub use serial::SerialExecutor;
pub use task::TaskExecutor;
pub use thread::ThreadExecutor;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::models::RunnableUnit;
use crate::reporter::Reporter;

/// One method to run and the reporter that receives its result
#[derive(Clone)]
pub struct Job {
    pub unit: Arc<RunnableUnit>,
    pub method: String,
    pub reporter: Arc<dyn Reporter>,
}

impl Job {
    pub fn new(unit: Arc<RunnableUnit>, method: impl Into<String>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            unit,
            method: method.into(),
            reporter,
        }
    }

    /// Run the method and record its result
    pub fn run(self) -> Result<(), ExecutorError> {
        let result = run_one_method(&self.unit, &self.method);
        self.reporter
            .record(&result)
            .map_err(|err| ExecutorError::Report {
                test: result.full_name(),
                message: format!("{err:#}"),
            })
    }
}

/// A backend that runs submitted jobs
pub trait Executor {
    /// Queue a job. Never drops work.
    fn submit(&self, job: Job) -> Result<(), ExecutorError>;

    /// Wait for every submitted job to finish and release the workers
    fn shutdown(&mut self) -> Result<(), ExecutorError>;

    /// Number of jobs that may run at once
    fn size(&self) -> usize;
}

/// Which executor backend runs parallel units
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorKind {
    #[default]
    Thread,
    Task,
    Serial,
}

impl ExecutorKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "thread" | "threads" => Some(ExecutorKind::Thread),
            "task" | "tasks" | "tokio" => Some(ExecutorKind::Task),
            "serial" => Some(ExecutorKind::Serial),
            _ => None,
        }
    }

    pub fn all() -> Vec<ExecutorKind> {
        vec![ExecutorKind::Thread, ExecutorKind::Task, ExecutorKind::Serial]
    }
}

impl fmt::Display for ExecutorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutorKind::Thread => write!(f, "thread"),
            ExecutorKind::Task => write!(f, "task"),
            ExecutorKind::Serial => write!(f, "serial"),
        }
    }
}

/// Build an executor of `kind` with `workers` slots. Zero workers runs serially.
pub fn build(kind: ExecutorKind, workers: usize) -> Result<Box<dyn Executor>, ExecutorError> {
    if workers == 0 {
        return Ok(Box::new(SerialExecutor::new()));
    }
    Ok(match kind {
        ExecutorKind::Thread => Box::new(ThreadExecutor::new(workers)?),
        ExecutorKind::Task => Box::new(TaskExecutor::new(workers)?),
        ExecutorKind::Serial => Box::new(SerialExecutor::new()),
    })
}
