//! Single method execution
//!
//! Runs one named method on a fresh [`Test`] context and turns whatever
//! happens inside it into a [`TestResult`]. Nothing a test body does, error
//! or panic, escapes this boundary.

use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

use crate::models::{Failure, RunnableUnit, Test, TestFn, TestResult};
use crate::utils::Timer;

/// Execute `method` of `unit`: setup, body, teardown.
///
/// Teardown runs even when setup or the body failed. When more than one
/// step fails the first failure is kept.
pub fn run_one_method(unit: &RunnableUnit, method: &str) -> TestResult {
    let timer = Timer::start(format!("{}#{}", unit.name(), method));
    let mut test = Test::new(unit.name(), method);

    let mut failure = unit
        .setup_hook()
        .and_then(|setup| guarded(setup, &mut test).err());

    if failure.is_none() {
        failure = match unit.method(method) {
            Some(m) => guarded(m.body(), &mut test).err(),
            None => Some(Failure::unexpected(&anyhow::anyhow!(
                "undefined method `{}` for {}",
                method,
                unit.name()
            ))),
        };
    }

    if let Some(teardown) = unit.teardown_hook() {
        if let Err(err) = guarded(teardown, &mut test) {
            failure.get_or_insert(err);
        }
    }

    let result = TestResult::pass(unit.name(), method, test.assertions()).with_elapsed(timer.stop());
    match failure {
        Some(failure) => {
            debug!("{} {}: {}", result.full_name(), failure.label(), failure.message);
            result.with_failure(failure)
        }
        None => result,
    }
}

fn guarded(step: &TestFn, test: &mut Test) -> Result<(), Failure> {
    match panic::catch_unwind(AssertUnwindSafe(|| step(test))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => Err(Failure::from_error(err)),
        Err(payload) => Err(Failure::from_panic(payload)),
    }
}
