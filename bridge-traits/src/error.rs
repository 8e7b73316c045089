//! Errors raised by host-provided bridge implementations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// The host has not wired this sink or capability.
    #[error("Bridge sink unavailable: {0}")]
    SinkUnavailable(String),

    /// The host sink rejected or failed to forward an entry.
    #[error("Bridge sink failed: {0}")]
    SinkFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Returns `true` when retrying the same call cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(self, BridgeError::SinkUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert() {
        let err: BridgeError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed").into();
        assert!(matches!(err, BridgeError::Io(_)));
        assert!(!err.is_permanent());
        assert!(BridgeError::SinkUnavailable("logcat".to_string()).is_permanent());
    }
}
