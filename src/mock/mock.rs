//! Mock objects
//!
//! Each method name owns a FIFO queue of expectations. A call consumes the
//! first still-available expectation whose matchers accept the arguments.

use std::collections::BTreeMap;
use tracing::debug;

use super::error::MockError;
use super::matcher::Matcher;
use super::value::Value;

/// Anything that can receive a dynamically dispatched call
pub trait Callable {
    fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, MockError>;

    fn responds_to(&self, name: &str) -> bool;
}

#[derive(Clone, Debug)]
struct Expectation {
    retval: Value,
    args: Vec<Matcher>,
    satisfied: bool,
}

/// A call that matched an expectation, with matchers substituted for the
/// arguments they accepted
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    pub retval: Value,
    pub args: Vec<Matcher>,
}

/// A test double returning canned values for expected calls
#[derive(Clone, Debug, Default)]
pub struct Mock {
    expected: BTreeMap<String, Vec<Expectation>>,
    /// Expected names in the order they were first expected
    order: Vec<String>,
    actual: BTreeMap<String, Vec<RecordedCall>>,
}

impl Mock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect a call to `name` with no arguments, returning `retval`
    pub fn expect(&mut self, name: impl Into<String>, retval: impl Into<Value>) -> &mut Self {
        self.expect_with(name, retval, Vec::new())
    }

    /// Expect a call to `name` whose arguments are accepted positionally by `args`
    pub fn expect_with(
        &mut self,
        name: impl Into<String>,
        retval: impl Into<Value>,
        args: Vec<Matcher>,
    ) -> &mut Self {
        let name = name.into();
        if !self.expected.contains_key(&name) {
            self.order.push(name.clone());
        }
        self.expected.entry(name).or_default().push(Expectation {
            retval: retval.into(),
            args,
            satisfied: false,
        });
        self
    }

    /// Calls recorded for `name`, in arrival order
    pub fn calls(&self, name: &str) -> &[RecordedCall] {
        self.actual.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Check that every expectation was consumed by a call
    pub fn verify(&self) -> Result<(), MockError> {
        for name in &self.order {
            let missing = self.expected.get(name).and_then(|all| all.iter().find(|e| !e.satisfied));
            let Some(missing) = missing else {
                continue;
            };

            let got = self
                .actual
                .get(name)
                .filter(|calls| !calls.is_empty())
                .map(|calls| {
                    calls
                        .iter()
                        .map(|c| format!("{}({})", name, join(&c.args)))
                        .collect::<Vec<_>>()
                        .join(", ")
                });

            return Err(MockError::Verification {
                name: name.clone(),
                args: join(&missing.args),
                retval: missing.retval.to_string(),
                got,
            });
        }
        Ok(())
    }

    pub(crate) fn expects(&self, name: &str) -> bool {
        self.expected.contains_key(name)
    }

    pub(crate) fn expected_names(&self) -> Vec<String> {
        self.order.clone()
    }
}

impl Callable for Mock {
    fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, MockError> {
        let Some(expectations) = self.expected.get_mut(name) else {
            return Err(MockError::Unmocked {
                name: name.to_string(),
                expected: self.order.iter().map(|k| format!(":{k}")).collect(),
            });
        };

        if !expectations.iter().any(|e| e.args.len() == args.len()) {
            let mut sizes: Vec<usize> = expectations.iter().map(|e| e.args.len()).collect();
            sizes.sort_unstable();
            sizes.dedup();
            return Err(MockError::ArgumentCount {
                name: name.to_string(),
                expected: sizes.iter().map(ToString::to_string).collect::<Vec<_>>().join("/"),
                given: args.len(),
            });
        }

        let Some(expectation) = expectations
            .iter_mut()
            .find(|e| !e.satisfied && Matcher::all_match(&e.args, args))
        else {
            let exhausted = expectations.iter().any(|e| Matcher::all_match(&e.args, args));
            let name = name.to_string();
            let args = join(args);
            return Err(if exhausted {
                MockError::NoMoreExpectations { name, args }
            } else {
                MockError::UnexpectedArguments { name, args }
            });
        };

        expectation.satisfied = true;
        let call = RecordedCall {
            retval: expectation.retval.clone(),
            args: expectation.args.clone(),
        };
        debug!("Mock call :{} matched, returning {}", name, call.retval);
        let retval = call.retval.clone();
        self.actual.entry(name.to_string()).or_default().push(call);
        Ok(retval)
    }

    fn responds_to(&self, name: &str) -> bool {
        self.expects(name)
    }
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
