//! Mock expectation errors

use thiserror::Error;

/// Errors raised by mocks at call time, `expect` time or `verify` time
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MockError {
    #[error("unmocked method :{name}, expected one of [{}]", .expected.join(", "))]
    Unmocked { name: String, expected: Vec<String> },

    #[error("mocked method :{name} expects {expected} arguments, got {given}")]
    ArgumentCount {
        name: String,
        expected: String,
        given: usize,
    },

    #[error("mocked method :{name} called with unexpected arguments [{args}]")]
    UnexpectedArguments { name: String, args: String },

    #[error("no more expects available for :{name}: [{args}]")]
    NoMoreExpectations { name: String, args: String },

    #[error("expected {name}({args}) => {retval}{}", .got.as_ref().map(|g| format!(", got [{g}]")).unwrap_or_default())]
    Verification {
        name: String,
        args: String,
        retval: String,
        got: Option<String>,
    },

    #[error("expected {constant} to define `{name}`, but it doesn't")]
    UndefinedMethod { constant: String, name: String },

    #[error("`{name}` expects {expected} arguments, given {given}")]
    ArityMismatch {
        name: String,
        expected: usize,
        given: usize,
    },

    #[error("undefined method `{name}`")]
    NoMethod { name: String },
}
