//! Error types for rulegate.
//!
//! All errors are strongly typed using thiserror. A failing rule predicate
//! is a display state, never an error; the variants here cover only the
//! configuration and runtime layers. The engine itself has no unrecoverable
//! state: the worst outcome of the automaton is a full buffer reset, which
//! is a designed transition.

use thiserror::Error;

/// Validation errors that occur during input validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Unknown rule id: {id}")]
    UnknownRule { id: String },

    #[error("Forbidden letters must be distinct ASCII lowercase, got '{first}' and '{second}'")]
    InvalidForbiddenLetters { first: char, second: char },

    #[error("Tick period for {task} must be non-zero")]
    ZeroTickPeriod { task: String },
}

/// Runtime errors from the session worker and its channels.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Command queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("Channel disconnected: {path}")]
    Disconnected { path: String },

    #[error("Operation timed out after {duration_ms}ms")]
    Timeout { duration_ms: u64 },
}

/// Top-level error type for rulegate.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl GateError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a runtime error.
    #[must_use]
    pub const fn is_runtime(&self) -> bool {
        matches!(self, Self::Runtime(_))
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Validation(_) | Self::Internal { .. } => false,
            Self::Runtime(e) => matches!(
                e,
                RuntimeError::QueueFull { .. } | RuntimeError::Timeout { .. }
            ),
        }
    }
}

/// Result type alias for rulegate operations.
pub type GateResult<T> = Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_rule_message() {
        let err = ValidationError::UnknownRule {
            id: "escort".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("escort"));
        assert!(msg.contains("Unknown rule"));
    }

    #[test]
    fn test_gate_error_from_validation() {
        let err: GateError = ValidationError::InvalidForbiddenLetters {
            first: 'a',
            second: 'a',
        }
        .into();
        assert!(err.is_validation());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_gate_error_from_runtime() {
        let err: GateError = RuntimeError::QueueFull { capacity: 16 }.into();
        assert!(err.is_runtime());
        assert!(err.is_retryable());

        let err: GateError = RuntimeError::Disconnected {
            path: "session".to_string(),
        }
        .into();
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_internal_error() {
        let err = GateError::internal("unexpected state");
        assert!(!err.is_validation());
        assert!(!err.is_retryable());
        let msg = format!("{err}");
        assert!(msg.contains("unexpected state"));
    }
}
