//! Strict mocks
//!
//! A [`StrictMock`] is bound to a named interface. When that interface is
//! known, `expect` checks that the method exists and that the number of
//! argument matchers equals its arity, failing at `expect` time. When the
//! interface is unknown it behaves exactly like a plain [`Mock`], which
//! keeps isolated unit tests independent of the full suite.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::error::MockError;
use super::matcher::Matcher;
use super::mock::{Callable, Mock};
use super::value::Value;

static INTERFACES: LazyLock<RwLock<BTreeMap<String, Interface>>> =
    LazyLock::new(|| RwLock::new(BTreeMap::new()));

/// Method table of a real type: method names and their arity
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interface {
    name: String,
    methods: BTreeMap<String, usize>,
}

impl Interface {
    /// `name` may be namespaced, e.g. `Namespace::Constant`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: BTreeMap::new(),
        }
    }

    pub fn method(mut self, name: impl Into<String>, arity: usize) -> Self {
        self.methods.insert(name.into(), arity);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self, method: &str) -> Option<usize> {
        self.methods.get(method).copied()
    }
}

/// Types that can describe their own method table
pub trait Describe {
    fn interface() -> Interface;
}

/// Make an interface resolvable by name for [`StrictMock::new`]
pub fn define_interface(interface: Interface) {
    INTERFACES.write().insert(interface.name.clone(), interface);
}

/// Resolve an interface by name. A leading `::` is ignored.
pub fn lookup_interface(name: &str) -> Option<Interface> {
    let name = name.strip_prefix("::").unwrap_or(name);
    INTERFACES.read().get(name).cloned()
}

pub struct StrictMock {
    constant: String,
    interface: Option<Interface>,
    mock: Mock,
}

impl StrictMock {
    /// Bind to the interface registered under `constant`, if any
    pub fn new(constant: impl Into<String>) -> Self {
        let constant = constant.into();
        let interface = lookup_interface(&constant);
        Self {
            constant,
            interface,
            mock: Mock::new(),
        }
    }

    /// Bind to the interface of a Rust type
    pub fn of<T: Describe>() -> Self {
        let interface = T::interface();
        Self {
            constant: interface.name.clone(),
            interface: Some(interface),
            mock: Mock::new(),
        }
    }

    pub fn expect(&mut self, name: impl Into<String>, retval: impl Into<Value>) -> Result<&mut Self, MockError> {
        self.expect_with(name, retval, Vec::new())
    }

    pub fn expect_with(
        &mut self,
        name: impl Into<String>,
        retval: impl Into<Value>,
        args: Vec<Matcher>,
    ) -> Result<&mut Self, MockError> {
        let name = name.into();

        if let Some(interface) = &self.interface {
            let Some(arity) = interface.arity(&name) else {
                return Err(MockError::UndefinedMethod {
                    constant: self.constant.clone(),
                    name,
                });
            };
            if arity != args.len() {
                return Err(MockError::ArityMismatch {
                    name,
                    expected: arity,
                    given: args.len(),
                });
            }
        }

        self.mock.expect_with(name, retval, args);
        Ok(self)
    }

    pub fn verify(&self) -> Result<(), MockError> {
        self.mock.verify()
    }

    pub fn constant(&self) -> &str {
        &self.constant
    }

    /// Whether the bound interface was found
    pub fn is_bound(&self) -> bool {
        self.interface.is_some()
    }

    pub fn expected_methods(&self) -> Vec<String> {
        self.mock.expected_names()
    }
}

impl Callable for StrictMock {
    fn call(&mut self, name: &str, args: &[Value]) -> Result<Value, MockError> {
        self.mock.call(name, args)
    }

    fn responds_to(&self, name: &str) -> bool {
        self.mock.responds_to(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct DefinedConstant;

    impl Describe for DefinedConstant {
        fn interface() -> Interface {
            Interface::new("DefinedConstant").method("defined_method", 0)
        }
    }

    fn define_fixtures() {
        define_interface(DefinedConstant::interface());
        define_interface(Interface::new("Namespace::NamespacedConstant").method("defined_method", 0));
    }

    #[test]
    fn test_valid_when_not_defined() {
        let mut mock = StrictMock::new("NotDefinedConstant");
        assert!(!mock.is_bound());
        mock.expect("defined_method", 42).unwrap();
        assert_eq!(mock.call("defined_method", &[]).unwrap(), Value::from(42));
        assert!(mock.verify().is_ok());
    }

    #[test]
    fn test_valid_when_defined_and_responds() {
        define_fixtures();
        let mut mock = StrictMock::new("DefinedConstant");
        mock.expect("defined_method", 42).unwrap();
        assert_eq!(mock.call("defined_method", &[]).unwrap(), Value::from(42));
        assert!(mock.verify().is_ok());
    }

    #[test]
    fn test_undefined_method_raises_at_expect() {
        define_fixtures();
        let mut mock = StrictMock::new("DefinedConstant");
        let err = mock.expect("not_defined_method", 42).err().unwrap();
        assert_eq!(
            err.to_string(),
            "expected DefinedConstant to define `not_defined_method`, but it doesn't"
        );
        assert!(mock.expected_methods().is_empty());
    }

    #[test]
    fn test_arity_mismatch_raises_at_expect() {
        let mut mock = StrictMock::of::<DefinedConstant>();
        let err = mock
            .expect_with("defined_method", 42, vec![1.into(), 2.into(), 3.into()])
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "`defined_method` expects 0 arguments, given 3");
    }

    #[test]
    fn test_namespaced_lookup() {
        define_fixtures();
        let mut mock = StrictMock::new("::Namespace::NamespacedConstant");
        assert!(mock.is_bound());
        assert!(mock.expect("not_defined_method", 42).is_err());

        let mut mock = StrictMock::new("Namespace::NotDefinedConstant");
        assert!(mock.expect("anything", 42).is_ok());
    }
}
