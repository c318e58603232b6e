//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts via `#[from]`.

/// Top-level error for greenhub operations.
#[derive(Debug, thiserror::Error)]
pub enum GreenhubError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("transport error")]
    Transport(#[from] TransportError),
}

/// A domain invariant was violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("device name must not be empty")]
    EmptyName,

    #[error("device id must not be empty")]
    EmptyDeviceId,
}

/// A request to the telemetry server failed.
///
/// Adapters map their own client errors into this type so that the
/// application layer never sees HTTP or browser specifics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed: {message}")]
pub struct TransportError {
    /// What was being attempted (e.g. `fetch snapshot`).
    pub operation: &'static str,
    /// Human-readable cause reported by the adapter.
    pub message: String,
}

impl TransportError {
    /// Build a transport error for the given operation.
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_wrap_validation_error_via_from() {
        let err: GreenhubError = ValidationError::EmptyName.into();
        assert!(matches!(
            err,
            GreenhubError::Validation(ValidationError::EmptyName)
        ));
    }

    #[test]
    fn should_format_transport_error_with_operation() {
        let err = TransportError::new("fetch snapshot", "HTTP 502");
        assert_eq!(err.to_string(), "fetch snapshot failed: HTTP 502");
    }
}
