//! Error types for the room client library

use thiserror::Error;

/// Result type for room client operations
pub type RoomResult<T> = Result<T, RoomError>;

/// Errors that can occur while coordinating a room session
///
/// Transport-level failures reported by the communications SDK surface as
/// [`RoomError::Connection`]. Audio contention is a policy condition rather
/// than a hard failure; it appears here only when an operation is refused
/// outright because the device is held by another process.
#[derive(Debug, Clone, Error)]
pub enum RoomError {
    /// The SDK rejected a connect, publish, subscribe or unsubscribe request
    #[error("connection error: {message}")]
    Connection {
        /// Description of the rejection
        message: String,
    },

    /// The device audio session is claimed by another process
    #[error("audio device in use by another process (code {code})")]
    AudioContention {
        /// Platform error code reported by the audio stack
        code: i32,
    },

    /// Invalid or incomplete client configuration
    #[error("configuration error: {message}")]
    Configuration {
        /// What is wrong with the configuration
        message: String,
    },

    /// Operation is not legal in the current session state
    #[error("invalid state: {message}")]
    InvalidState {
        /// The operation and the state it was attempted in
        message: String,
    },

    /// No remote stream registered under the given identifier
    #[error("stream not found: {stream_id}")]
    StreamNotFound {
        /// Identifier that failed to resolve
        stream_id: String,
    },

    /// Internal error
    #[error("internal error: {message}")]
    Internal {
        /// Description of the failure
        message: String,
    },
}

impl RoomError {
    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
