//! Partial mocks over live objects
//!
//! A [`Mocker`] wraps a real object behind the same [`Callable`] seam.
//! Expected methods are intercepted by an inner [`Mock`]; everything else is
//! forwarded. `verify` restores every intercepted method whatever its
//! outcome, after which all calls reach the wrapped object again.

use std::collections::BTreeSet;
use tracing::debug;

use super::error::MockError;
use super::matcher::Matcher;
use super::mock::{Callable, Mock};
use super::value::Value;

pub struct Mocker<T> {
    inner: T,
    mock: Mock,
    intercepted: BTreeSet<String>,
}

impl<T: Callable> Mocker<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            mock: Mock::new(),
            intercepted: BTreeSet::new(),
        }
    }

    pub fn expect(&mut self, name: impl Into<String>, retval: impl Into<Value>) -> &mut Self {
        self.expect_with(name, retval, Vec::new())
    }

    pub fn expect_with(
        &mut self,
        name: impl Into<String>,
        retval: impl Into<Value>,
        args: Vec<Matcher>,
    ) -> &mut Self {
        let name = name.into();
        self.intercepted.insert(name.clone());
        self.mock.expect_with(name, retval, args);
        self
    }

    /// Verify the expectations, then restore the original methods
    pub fn verify(&mut self) -> Result<(), MockError> {
        let outcome = self.mock.verify();
        debug!("Restoring {} mocked methods", self.intercepted.len());
        self.intercepted.clear();
        outcome
    }

    pub fn is_intercepting(&self, name: &str) -> bool {
        self.intercepted.contains(name)
    }
}

impl<T: Callable> Callable for Mocker<T> {
    fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, MockError> {
        if self.intercepted.contains(name) {
            self.mock.call(name, args)
        } else {
            self.inner.call(name, args)
        }
    }

    fn responds_to(&self, name: &str) -> bool {
        self.intercepted.contains(name) || self.inner.responds_to(name)
    }
}
