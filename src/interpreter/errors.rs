//! Runtime error types for the script interpreter
//!
//! [`RuntimeError`] separates two families:
//!
//! - [`RuntimeError::Thrown`]: a script-level exception. User `try/catch` can
//!   intercept it, and the runner's inner guard turns an uncaught one into
//!   `"Error: <message>"` appended to the transcript.
//! - Every other variant is a sandbox limit. These are host errors: scripts
//!   cannot catch them, and they replace the whole output.

use crate::memory::value::{ErrorKind, JsObject, Value};
use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, Error)]
pub enum RuntimeError {
    /// A thrown script value (explicit `throw` or a builtin TypeError etc.)
    #[error("Uncaught {value} (line {}, column {})", .location.line, .location.column)]
    Thrown {
        value: Value,
        location: SourceLocation,
    },

    #[error("Execution step limit exceeded ({limit} steps)")]
    StepLimitExceeded { limit: u64 },

    #[error("Maximum call stack size exceeded ({limit} nested calls)")]
    CallDepthExceeded {
        limit: usize,
        location: SourceLocation,
    },

    #[error("String length limit exceeded ({limit} bytes)")]
    StringTooLong {
        limit: usize,
        location: SourceLocation,
    },

    #[error("Output limit exceeded ({limit} bytes)")]
    OutputLimitExceeded {
        limit: usize,
        location: SourceLocation,
    },
}

impl RuntimeError {
    /// Build a catchable error instance of the given kind
    pub fn throw(kind: ErrorKind, message: impl AsRef<str>, location: SourceLocation) -> Self {
        RuntimeError::Thrown {
            value: Value::new_object(JsObject::error(kind, message.as_ref())),
            location,
        }
    }

    pub fn type_error(message: impl AsRef<str>, location: SourceLocation) -> Self {
        Self::throw(ErrorKind::TypeError, message, location)
    }

    pub fn range_error(message: impl AsRef<str>, location: SourceLocation) -> Self {
        Self::throw(ErrorKind::RangeError, message, location)
    }

    pub fn reference_error(message: impl AsRef<str>, location: SourceLocation) -> Self {
        Self::throw(ErrorKind::ReferenceError, message, location)
    }

    /// Whether user code may intercept this error with `catch`
    pub fn is_catchable(&self) -> bool {
        matches!(self, RuntimeError::Thrown { .. })
    }

    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            RuntimeError::Thrown { location, .. }
            | RuntimeError::CallDepthExceeded { location, .. }
            | RuntimeError::StringTooLong { location, .. }
            | RuntimeError::OutputLimitExceeded { location, .. } => Some(*location),
            RuntimeError::StepLimitExceeded { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thrown_error_display() {
        let err = RuntimeError::type_error("x is not a function", SourceLocation::new(3, 7));

        assert!(err.is_catchable());
        assert_eq!(
            err.to_string(),
            "Uncaught TypeError: x is not a function (line 3, column 7)"
        );
    }

    #[test]
    fn test_limits_are_not_catchable() {
        let err = RuntimeError::StepLimitExceeded { limit: 10 };

        assert!(!err.is_catchable());
        assert_eq!(err.location(), None);
        assert_eq!(err.to_string(), "Execution step limit exceeded (10 steps)");
    }
}
