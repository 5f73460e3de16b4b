//! Failure models for test execution
//!
//! A failure is the tagged outcome of a test that did not pass cleanly.

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::panic::Location;
use thiserror::Error;

use crate::mock::MockError;

/// Kind of a test failure
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Explicit test-logic failure raised by an assertion
    Assertion,
    /// Intentional non-execution
    Skip,
    /// Anything not raised by the assertion vocabulary
    UnexpectedError,
}

impl FailureKind {
    /// Label used in the detail list
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::Assertion => "Failure",
            FailureKind::Skip => "Skipped",
            FailureKind::UnexpectedError => "Error",
        }
    }

    /// Single progress character, the first letter of the label
    pub fn code(&self) -> char {
        match self {
            FailureKind::Assertion => 'F',
            FailureKind::Skip => 'S',
            FailureKind::UnexpectedError => 'E',
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Failure raised by a test method
#[derive(Clone, Debug, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
    /// Formatted source chain of the wrapped error (unexpected errors only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    /// `file:line` of the assertion that raised it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Failure {
    fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
            location: None,
        }
    }

    #[track_caller]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Assertion, message).at(Location::caller())
    }

    #[track_caller]
    pub fn skip(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Skip, message).at(Location::caller())
    }

    /// Wrap an error that escaped a test body
    pub fn unexpected(error: &anyhow::Error) -> Self {
        let mut failure = Self::new(FailureKind::UnexpectedError, error.to_string());
        let chain = format!("{error:#}");
        if chain != failure.message {
            failure.cause = Some(chain);
        }
        failure
    }

    /// Wrap a panic payload caught at the method boundary
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::new(FailureKind::UnexpectedError, format!("panicked: {message}"))
    }

    /// Classify an error returned by a test body.
    ///
    /// A [`Failure`] keeps its kind, a [`MockError`] counts as an assertion
    /// failure, everything else is unexpected.
    pub fn from_error(error: anyhow::Error) -> Self {
        match error.downcast::<Failure>() {
            Ok(failure) => failure,
            Err(error) => match error.downcast::<MockError>() {
                Ok(mock) => mock.into(),
                Err(error) => Self::unexpected(&error),
            },
        }
    }

    fn at(mut self, location: &Location<'_>) -> Self {
        self.location = Some(format!("{}:{}", location.file(), location.line()));
        self
    }

    pub fn is_skip(&self) -> bool {
        self.kind == FailureKind::Skip
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

impl From<MockError> for Failure {
    fn from(error: MockError) -> Self {
        Self::new(FailureKind::Assertion, error.to_string())
    }
}
