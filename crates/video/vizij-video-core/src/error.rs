//! Error types for the video player

use serde::{Deserialize, Serialize};

/// Failures reported by a [`crate::MediaResource`] implementation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MediaError {
    /// The backing decoder/element rejected an operation.
    #[error("media backend error: {message}")]
    Backend { message: String },
}

impl MediaError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Errors returned by [`crate::MediaPlayer`] operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PlayerError {
    /// Caller passed a value the player cannot use (bad source, bad config).
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The media resource failed while the player drove it.
    #[error(transparent)]
    Media(#[from] MediaError),
}

impl PlayerError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "argument",
            Self::Media(_) => "media",
        }
    }
}
