//! Thread pool executor
//!
//! A fixed set of named worker threads pulling from one unbounded FIFO
//! queue. `None` on the queue is the sentinel that tells one worker to exit;
//! `shutdown()` sends one per worker and joins them all.

use crossbeam::channel::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

use super::{Executor, ExecutorError, Job};

type Message = Option<Job>;

struct Worker {
    name: String,
    handle: JoinHandle<Result<usize, ExecutorError>>,
}

/// Default executor for parallel units
pub struct ThreadExecutor {
    sender: Option<Sender<Message>>,
    workers: Vec<Worker>,
    size: usize,
}

impl ThreadExecutor {
    /// Start `size` worker threads
    pub fn new(size: usize) -> Result<Self, ExecutorError> {
        if size == 0 {
            return Err(ExecutorError::EmptyPool);
        }

        let (sender, receiver) = channel::unbounded::<Message>();
        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            let name = format!("testrig-worker-{id}");
            let queue = receiver.clone();
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || work(queue))
                .map_err(ExecutorError::Spawn)?;
            workers.push(Worker { name, handle });
        }

        info!("Started thread executor with {} workers", size);
        Ok(Self {
            sender: Some(sender),
            workers,
            size,
        })
    }
}

fn work(queue: Receiver<Message>) -> Result<usize, ExecutorError> {
    let mut done = 0;
    // A closed queue ends the loop like a sentinel does.
    while let Ok(Some(job)) = queue.recv() {
        job.run()?;
        done += 1;
    }
    Ok(done)
}

impl Executor for ThreadExecutor {
    fn submit(&self, job: Job) -> Result<(), ExecutorError> {
        let sender = self.sender.as_ref().ok_or(ExecutorError::QueueClosed)?;
        sender
            .send(Some(job))
            .map_err(|_| ExecutorError::QueueClosed)
    }

    fn shutdown(&mut self) -> Result<(), ExecutorError> {
        let Some(sender) = self.sender.take() else {
            return Ok(());
        };

        for _ in 0..self.workers.len() {
            // Fails only once every worker is gone; their errors are collected below.
            if sender.send(None).is_err() {
                break;
            }
        }
        drop(sender);

        let mut first_error = None;
        for worker in self.workers.drain(..) {
            let outcome = match worker.handle.join() {
                Ok(outcome) => outcome,
                Err(_) => Err(ExecutorError::WorkerPanicked {
                    worker: worker.name.clone(),
                }),
            };
            match outcome {
                Ok(done) => debug!("{} finished after {} jobs", worker.name, done),
                Err(err) => {
                    warn!("{} stopped: {}", worker.name, err);
                    first_error.get_or_insert(err);
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    fn size(&self) -> usize {
        self.size
    }
}

impl Drop for ThreadExecutor {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            warn!("Thread executor shut down with error: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::tests::{counting_unit, reporter};
    use crate::models::RunnableUnit;
    use parking_lot::Mutex;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    #[test]
    fn test_empty_pool_is_rejected() {
        assert!(matches!(ThreadExecutor::new(0), Err(ExecutorError::EmptyPool)));
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut executor = ThreadExecutor::new(3).unwrap();
        assert_eq!(executor.size(), 3);
        executor.shutdown().unwrap();
        executor.shutdown().unwrap();

        let unit = counting_unit(1);
        let submitted = executor.submit(Job::new(unit, "test_0", reporter()));
        assert!(matches!(submitted, Err(ExecutorError::QueueClosed)));
    }

    #[test]
    fn test_jobs_run_on_named_workers() {
        let seen = Arc::new(Mutex::new(BTreeSet::new()));
        let mut unit = RunnableUnit::new("TestThreads").parallel();
        for i in 0..16 {
            let seen = seen.clone();
            unit = unit.test(format!("test_{i}"), move |t| {
                let name = thread::current().name().unwrap_or_default().to_string();
                seen.lock().insert(name);
                t.pass();
                Ok(())
            });
        }
        let unit = Arc::new(unit);

        let reporter = reporter();
        let mut executor = ThreadExecutor::new(2).unwrap();
        for method in unit.method_names() {
            executor.submit(Job::new(unit.clone(), method, reporter.clone())).unwrap();
        }
        executor.shutdown().unwrap();

        assert_eq!(reporter.count(), 16);
        assert!(seen.lock().iter().all(|n| n.starts_with("testrig-worker-")));
    }

    #[test]
    fn test_drop_drains_queue() {
        let unit = counting_unit(10);
        let reporter = reporter();
        {
            let executor = ThreadExecutor::new(2).unwrap();
            for method in unit.method_names() {
                executor.submit(Job::new(unit.clone(), method, reporter.clone())).unwrap();
            }
        }
        assert_eq!(reporter.count(), 10);
    }
}
