//! Argument matchers
//!
//! A matcher accepts an argument either by equality with a literal or by
//! set membership (a value kind, a wildcard or a named predicate).

use std::fmt;
use std::sync::Arc;

use super::value::{Value, ValueKind};

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Positional argument matcher
#[derive(Clone)]
pub enum Matcher {
    /// Accepts an equal value
    Eq(Value),
    /// Accepts any value of this kind
    Kind(ValueKind),
    /// Accepts anything
    Any,
    /// Accepts values satisfying the predicate
    Predicate { name: String, test: Predicate },
}

impl Matcher {
    pub fn any() -> Self {
        Matcher::Any
    }

    pub fn kind(kind: ValueKind) -> Self {
        Matcher::Kind(kind)
    }

    pub fn predicate<F>(name: impl Into<String>, test: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Matcher::Predicate {
            name: name.into(),
            test: Arc::new(test),
        }
    }

    /// Case equality: membership test or plain equality
    pub fn matches(&self, arg: &Value) -> bool {
        match self {
            Matcher::Eq(expected) => expected == arg,
            Matcher::Kind(kind) => arg.kind() == *kind,
            Matcher::Any => true,
            Matcher::Predicate { test, .. } => test(arg),
        }
    }

    /// True when every matcher accepts its positional argument
    pub fn all_match(matchers: &[Matcher], args: &[Value]) -> bool {
        matchers.len() == args.len() && matchers.iter().zip(args).all(|(m, a)| m.matches(a))
    }
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Matcher::Eq(a), Matcher::Eq(b)) => a == b,
            (Matcher::Kind(a), Matcher::Kind(b)) => a == b,
            (Matcher::Any, Matcher::Any) => true,
            (Matcher::Predicate { name: a, test: ta }, Matcher::Predicate { name: b, test: tb }) => {
                a == b && Arc::ptr_eq(ta, tb)
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Eq(value) => write!(f, "{value}"),
            Matcher::Kind(kind) => write!(f, "{kind}"),
            Matcher::Any => write!(f, "_"),
            Matcher::Predicate { name, .. } => write!(f, "<{name}>"),
        }
    }
}

impl From<ValueKind> for Matcher {
    fn from(kind: ValueKind) -> Self {
        Matcher::Kind(kind)
    }
}

impl From<Value> for Matcher {
    fn from(value: Value) -> Self {
        Matcher::Eq(value)
    }
}

macro_rules! literal_matcher {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Matcher {
                fn from(value: $ty) -> Self {
                    Matcher::Eq(Value::from(value))
                }
            }
        )*
    };
}

literal_matcher!(bool, i32, i64, f64, &str, String);
