use std::io;
use thiserror::Error;

/// Errors raised by the execution backends themselves, never by tests
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("worker pool needs at least one worker")]
    EmptyPool,

    #[error("executor has been shut down")]
    QueueClosed,

    #[error("failed to spawn worker thread: {0}")]
    Spawn(io::Error),

    #[error("failed to build task runtime: {0}")]
    Runtime(io::Error),

    #[error("worker {worker} panicked outside a test body")]
    WorkerPanicked { worker: String },

    #[error("reporter failed while recording {test}: {message}")]
    Report { test: String, message: String },
}
