//! Mock object engine
//!
//! Test doubles that return canned values for expected calls and verify
//! afterwards that every expected call happened. Calls go through the
//! [`Callable`] seam: `call(name, args)`.
//!
//! ```
//! use testrig::mock::{Callable, Mock, Value};
//!
//! let mut mock = Mock::new();
//! mock.expect("meaning_of_life", 42);
//! assert_eq!(mock.call("meaning_of_life", &[]).unwrap(), Value::Int(42));
//! assert!(mock.verify().is_ok());
//! ```

mod error;
mod matcher;
#[allow(clippy::module_inception)]
mod mock;
mod mocker;
mod strict;
mod value;

pub use error::MockError;
pub use matcher::Matcher;
pub use mock::{Callable, Mock, RecordedCall};
pub use mocker::Mocker;
pub use strict::{define_interface, lookup_interface, Describe, Interface, StrictMock};
pub use value::{Value, ValueKind};
