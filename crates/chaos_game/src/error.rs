//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! start-time validation (weights, readiness, run parameters), lifecycle violations
//! reported by [`crate::controller::Controller`], and worker spawn failures.
//!
//! Cancelling a run is not an error; it is reported as
//! [`crate::session::SessionStatus::Cancelled`].
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("shape {shape} has invalid weight {weight}; weights must be finite and > 0")]
    InvalidWeight { shape: usize, weight: f64 },

    #[error("shape {shape} has {vertices} vertices; at least 2 are required")]
    NotReady { shape: usize, vertices: usize },

    #[error("a generation session is already running")]
    AlreadyRunning,

    #[error("cannot remove the last remaining shape")]
    LastShape,

    #[error("operation not allowed: {0}")]
    Locked(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_weight_message_names_shape_and_weight() {
        let err = Error::InvalidWeight {
            shape: 2,
            weight: -1.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("shape 2"));
        assert!(msg.contains("-1.5"));
    }

    #[test]
    fn io_errors_convert_transparently() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "no threads left");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "no threads left");
    }
}
