//! Tokio-backed executor
//!
//! Alternate backend: jobs run on the blocking pool of a private tokio
//! runtime, at most `size` at a time. Shutdown may be called from inside
//! another tokio runtime, in which case the private runtime is drained and
//! dropped on a helper thread.

use futures::future::join_all;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use super::{Executor, ExecutorError, Job};

type TaskHandle = JoinHandle<Result<(), ExecutorError>>;
type TaskOutcome = Result<Result<(), ExecutorError>, JoinError>;

pub struct TaskExecutor {
    runtime: Option<Runtime>,
    semaphore: Arc<Semaphore>,
    handles: Mutex<Vec<TaskHandle>>,
    size: usize,
}

impl TaskExecutor {
    pub fn new(size: usize) -> Result<Self, ExecutorError> {
        if size == 0 {
            return Err(ExecutorError::EmptyPool);
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(size)
            .thread_name("testrig-task")
            .enable_all()
            .build()
            .map_err(ExecutorError::Runtime)?;

        info!("Started task executor with {} permits", size);
        Ok(Self {
            runtime: Some(runtime),
            semaphore: Arc::new(Semaphore::new(size)),
            handles: Mutex::new(Vec::new()),
            size,
        })
    }
}

impl Executor for TaskExecutor {
    fn submit(&self, job: Job) -> Result<(), ExecutorError> {
        let runtime = self.runtime.as_ref().ok_or(ExecutorError::QueueClosed)?;
        let semaphore = self.semaphore.clone();
        let name = format!("{}#{}", job.unit.name(), job.method);

        let handle = runtime.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|_| ExecutorError::QueueClosed)?;
            debug!("Running {}", name);
            tokio::task::spawn_blocking(move || job.run())
                .await
                .map_err(|_| ExecutorError::WorkerPanicked { worker: name })?
        });

        self.handles.lock().push(handle);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), ExecutorError> {
        let Some(runtime) = self.runtime.take() else {
            return Ok(());
        };

        let handles = std::mem::take(&mut *self.handles.lock());
        let outcomes = if Handle::try_current().is_ok() {
            debug!("Draining task executor on a helper thread");
            std::thread::Builder::new()
                .name("testrig-task-drain".to_string())
                .spawn(move || drain(runtime, handles))
                .map_err(ExecutorError::Spawn)?
                .join()
                .map_err(|_| ExecutorError::WorkerPanicked {
                    worker: "testrig-task-drain".to_string(),
                })?
        } else {
            drain(runtime, handles)
        };

        let mut first_error = None;
        for (i, outcome) in outcomes.into_iter().enumerate() {
            let outcome = outcome.unwrap_or_else(|_| {
                Err(ExecutorError::WorkerPanicked {
                    worker: format!("task-{i}"),
                })
            });
            if let Err(err) = outcome {
                warn!("Task {} failed: {}", i, err);
                first_error.get_or_insert(err);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    fn size(&self) -> usize {
        self.size
    }
}

/// Wait for every task, then drop the runtime on the calling thread
fn drain(runtime: Runtime, handles: Vec<TaskHandle>) -> Vec<TaskOutcome> {
    let outcomes = runtime.block_on(join_all(handles));
    drop(runtime);
    outcomes
}

impl Drop for TaskExecutor {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            warn!("Task executor shut down with error: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RunnableUnit;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_concurrency_bounded_by_permits() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut unit = RunnableUnit::new("TestPermits").parallel();
        for i in 0..12 {
            let (running, peak) = (running.clone(), peak.clone());
            unit = unit.test(format!("test_{i}"), move |t| {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                std::thread::sleep(Duration::from_millis(5));
                running.fetch_sub(1, Ordering::SeqCst);
                t.pass();
                Ok(())
            });
        }
        let unit = Arc::new(unit);

        let reporter = crate::executor::tests::reporter();
        let mut executor = TaskExecutor::new(3).unwrap();
        for method in unit.method_names() {
            executor.submit(Job::new(unit.clone(), method, reporter.clone())).unwrap();
        }
        executor.shutdown().unwrap();

        assert_eq!(reporter.count(), 12);
        assert!(peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_shutdown_inside_async_runtime() {
        let unit = crate::executor::tests::counting_unit(5);
        let reporter = crate::executor::tests::reporter();
        let mut executor = TaskExecutor::new(2).unwrap();
        for method in unit.method_names() {
            executor.submit(Job::new(unit.clone(), method, reporter.clone())).unwrap();
        }
        executor.shutdown().unwrap();
        drop(executor);

        assert_eq!(reporter.count(), 5);
    }

    #[test]
    fn test_submit_after_shutdown() {
        let mut executor = TaskExecutor::new(1).unwrap();
        executor.shutdown().unwrap();
        let unit = crate::executor::tests::counting_unit(1);
        let job = Job::new(unit, "test_0", crate::executor::tests::reporter());
        assert!(matches!(executor.submit(job), Err(ExecutorError::QueueClosed)));
    }
}
