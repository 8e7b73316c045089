//! # Playback Error Types
//!
//! Errors returned synchronously by playback commands, plus the mapping
//! from fatal engine errors to wire error codes.

use bridge_traits::{CauseKind, EngineError, ErrorCode};
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    // ========================================================================
    // Queue Errors
    // ========================================================================
    /// Index does not address a slot in the queue.
    #[error("Index {index} out of bounds for queue of {len} track(s)")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Skip to previous requested on the first track.
    #[error("No previous track")]
    NoPreviousTrack,

    /// Skip to next requested on the last track.
    #[error("No next track, the queue is exhausted")]
    QueueExhausted,

    // ========================================================================
    // Parameter Errors
    // ========================================================================
    /// Invalid volume value (must be in range [0.0, 1.0]).
    #[error("Invalid volume: {0} (must be between 0.0 and 1.0)")]
    InvalidVolume(f32),

    /// Invalid playback rate (must be finite and positive).
    #[error("Invalid playback rate: {0} (must be greater than 0)")]
    InvalidRate(f32),

    /// Invalid volume multiplier (must be finite and positive).
    #[error("Invalid volume multiplier: {0} (must be greater than 0)")]
    InvalidMultiplier(f32),
}

impl PlaybackError {
    /// Wire code reported to the host for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PlaybackError::IndexOutOfBounds { .. } => ErrorCode::IndexOutOfBounds,
            PlaybackError::NoPreviousTrack => ErrorCode::NoPreviousTrack,
            PlaybackError::QueueExhausted => ErrorCode::QueueExhausted,
            PlaybackError::InvalidVolume(_)
            | PlaybackError::InvalidRate(_)
            | PlaybackError::InvalidMultiplier(_) => ErrorCode::Playback,
        }
    }

    /// Returns `true` if the error came from queue addressing rather than
    /// parameter validation.
    pub fn is_queue_error(&self) -> bool {
        matches!(
            self,
            PlaybackError::IndexOutOfBounds { .. }
                | PlaybackError::NoPreviousTrack
                | PlaybackError::QueueExhausted
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Map a fatal engine error to the code and message reported to the host.
///
/// The message comes from the cause when it carries one.
pub fn classify(error: &EngineError) -> (ErrorCode, &str) {
    let Some(cause) = error.cause.as_ref() else {
        return (ErrorCode::Playback, &error.message);
    };

    let code = match cause.kind {
        CauseKind::HttpDataSource => ErrorCode::PlaybackSource,
        CauseKind::Renderer => ErrorCode::PlaybackRenderer,
        _ => ErrorCode::Playback,
    };
    let message = cause.message.as_deref().unwrap_or(&error.message);

    (code, message)
}
