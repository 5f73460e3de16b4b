//! Fan-out reporter

use anyhow::Result;
use parking_lot::Mutex;
use std::sync::Arc;

use super::summary::Summary;
use super::Reporter;
use crate::models::TestResult;

/// Dispatches every call to each sub-reporter, in order.
///
/// Recording holds one guard for the whole fan-out, so every sub-reporter
/// sees results in the same arrival order.
#[derive(Default)]
pub struct CompositeReporter {
    reporters: Vec<Arc<dyn Reporter>>,
    guard: Mutex<()>,
}

impl CompositeReporter {
    pub fn new(reporters: Vec<Arc<dyn Reporter>>) -> Self {
        Self {
            reporters,
            guard: Mutex::new(()),
        }
    }

    /// Add another reporter to the mix
    pub fn push(&mut self, reporter: Arc<dyn Reporter>) {
        self.reporters.push(reporter);
    }

    pub fn with(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.push(reporter);
        self
    }

    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

impl Reporter for CompositeReporter {
    fn start(&self) -> Result<()> {
        self.reporters.iter().try_for_each(|r| r.start())
    }

    fn record(&self, result: &TestResult) -> Result<()> {
        let _guard = self.guard.lock();
        self.reporters.iter().try_for_each(|r| r.record(result))
    }

    /// Reports through every sub-reporter and returns the first one's summary
    fn report(&self) -> Result<Summary> {
        let mut first = None;
        for reporter in &self.reporters {
            let summary = reporter.report()?;
            first.get_or_insert(summary);
        }
        Ok(first.unwrap_or_default())
    }

    fn passed(&self) -> bool {
        self.reporters.iter().all(|r| r.passed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Failure;
    use crate::reporter::{ProgressReporter, ReporterOptions, SharedBuffer};

    fn progress() -> (Arc<ProgressReporter>, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let reporter = ProgressReporter::new(buffer.sink(), ReporterOptions::default());
        (Arc::new(reporter), buffer)
    }

    #[test]
    fn test_fans_out_exactly_once() {
        let (a, _) = progress();
        let (b, _) = progress();
        let composite = CompositeReporter::new(vec![a.clone() as Arc<dyn Reporter>, b.clone()]);

        composite.start().unwrap();
        composite.record(&TestResult::pass("TestA", "test_a", 2)).unwrap();
        composite.record(&TestResult::pass("TestA", "test_b", 1)).unwrap();

        assert_eq!(a.count(), 2);
        assert_eq!(b.count(), 2);
        assert_eq!(b.assertions(), 3);
        assert_eq!(composite.report().unwrap().runs, 2);
    }

    #[test]
    fn test_passed_is_conjunction() {
        let (a, _) = progress();
        let (b, _) = progress();
        let composite = CompositeReporter::default().with(a.clone()).with(b.clone());
        composite.start().unwrap();
        assert!(composite.passed());

        // Only `b` sees the failure.
        b.record(&TestResult::pass("TestA", "test_x", 1).with_failure(Failure::assertion("no")))
            .unwrap();
        assert!(a.passed());
        assert!(!composite.passed());
    }

    #[test]
    fn test_empty_composite() {
        let composite = CompositeReporter::default();
        assert!(composite.is_empty());
        composite.start().unwrap();
        assert!(composite.passed());
        assert_eq!(composite.report().unwrap(), Summary::default());
    }
}
