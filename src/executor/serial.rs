use super::{Executor, ExecutorError, Job};

/// Runs each job on the caller's thread as soon as it is submitted
#[derive(Debug, Default)]
pub struct SerialExecutor {
    closed: bool,
}

impl SerialExecutor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Executor for SerialExecutor {
    fn submit(&self, job: Job) -> Result<(), ExecutorError> {
        if self.closed {
            return Err(ExecutorError::QueueClosed);
        }
        job.run()
    }

    fn shutdown(&mut self) -> Result<(), ExecutorError> {
        self.closed = true;
        Ok(())
    }

    fn size(&self) -> usize {
        1
    }
}
