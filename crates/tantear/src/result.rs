//! Result and error types for Tantear.

use thiserror::Error;

/// Result type for Tantear operations
pub type TantearResult<T> = Result<T, TantearError>;

/// Errors that can occur in Tantear.
///
/// Element absence is deliberately NOT an error: exhausting every locator
/// strategy yields `None`, and the calling scenario decides whether that
/// constitutes a test failure. The variants here cover the remote transport,
/// artifact I/O, and assertion channels.
#[derive(Debug, Error)]
pub enum TantearError {
    /// The remote call itself failed (network, bridge process, device)
    #[error("Transport error during {operation}: {message}")]
    Transport {
        /// Operation that was in flight
        operation: String,
        /// Error message from the bridge
        message: String,
    },

    /// Session could not be established or configured
    #[error("Session error: {message}")]
    Session {
        /// Error message
        message: String,
    },

    /// Screenshot capture failed
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// Screenshot bytes could not be decoded as an image
    #[error("Image decode failed: {message}")]
    ImageDecode {
        /// Error message
        message: String,
    },

    /// The device or app refused an orientation change
    #[error("Orientation change rejected: {message}")]
    OrientationLocked {
        /// Error message
        message: String,
    },

    /// A scenario expectation was violated
    #[error("Assertion failed: {message}")]
    Assertion {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TantearError {
    /// Shorthand for a transport-level failure
    #[must_use]
    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Whether this error came from the remote transport
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
