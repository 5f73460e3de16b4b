//! Runnable registry
//!
//! Process-wide list of runnable units in registration order, plus the
//! hooks to run once a run has been reported. The global registry is
//! created on first use and only ever emptied through [`reset`].

mod filter;

pub use filter::Filter;

use parking_lot::Mutex;
use std::sync::{Arc, LazyLock};
use tracing::debug;

use crate::models::RunnableUnit;

type AfterRunHook = Box<dyn FnOnce() + Send>;

static RUNNABLES: LazyLock<Mutex<Registry>> = LazyLock::new(|| Mutex::new(Registry::new()));

/// An ordered collection of runnable units
#[derive(Default)]
pub struct Registry {
    units: Vec<Arc<RunnableUnit>>,
    after_run: Vec<AfterRunHook>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a unit. Registering the same unit twice runs it twice.
    pub fn register(&mut self, unit: RunnableUnit) -> Arc<RunnableUnit> {
        debug!("Registered {}", unit);
        let unit = Arc::new(unit);
        self.units.push(Arc::clone(&unit));
        unit
    }

    /// Snapshot of every unit in registration order
    pub fn all_units(&self) -> Vec<Arc<RunnableUnit>> {
        self.units.clone()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn after_run(&mut self, hook: AfterRunHook) {
        self.after_run.push(hook);
    }

    /// Drain the after-run hooks in the order they must run (newest first)
    pub fn take_after_run(&mut self) -> Vec<AfterRunHook> {
        let mut hooks = std::mem::take(&mut self.after_run);
        hooks.reverse();
        hooks
    }

    pub fn clear(&mut self) {
        self.units.clear();
        self.after_run.clear();
    }
}

/// Register a unit in the process-wide registry
pub fn register(unit: RunnableUnit) -> Arc<RunnableUnit> {
    RUNNABLES.lock().register(unit)
}

/// Snapshot of the process-wide registry
pub fn all_units() -> Vec<Arc<RunnableUnit>> {
    RUNNABLES.lock().all_units()
}

/// Method names on `unit` selected by a filter string (`/regex/` or exact)
pub fn methods_matching(unit: &RunnableUnit, pattern: &str) -> Result<Vec<String>, regex::Error> {
    Ok(unit.methods_matching(&Filter::parse(pattern)?))
}

/// Run `hook` after the next top-level run has been reported
pub fn after_run<F>(hook: F)
where
    F: FnOnce() + Send + 'static,
{
    RUNNABLES.lock().after_run(Box::new(hook));
}

pub(crate) fn take_after_run() -> Vec<AfterRunHook> {
    RUNNABLES.lock().take_after_run()
}

/// Empty the process-wide registry. Meant for test isolation.
pub fn reset() {
    RUNNABLES.lock().clear();
}
