//! Core room session types
//!
//! This module contains the session state machine and the stream bookkeeping
//! types shared across the library. All actual media transport is delegated
//! to the external communications SDK behind [`crate::transport::RoomTransport`].
//!
//! # Key Components
//!
//! - **SessionState** - Current phase of the room session lifecycle
//! - **StreamId** - Identifier the SDK assigns to a published stream
//! - **RemoteStream** - A remote participant stream this client subscribed to
//! - **LocalPublication** - The locally published stream, present only while publishing
//!
//! # Session Lifecycle
//!
//! ```text
//! Disconnected --connect()--> Connecting
//! Connecting --Connected, audio free--> Connected (publish requested)
//! Connecting --Connected, audio busy--> Connecting (disconnect requested)
//! Connected --PublishConfirmed--> Publishing
//! Publishing --PublishLost--> Connected (disconnect requested)
//! any --Disconnected--> Disconnected (auto reconnect if pending)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a media stream within a room session
///
/// Stream identifiers are assigned by the communications SDK and are opaque
/// to this library; they are only compared and used as registry keys.
///
/// # Examples
///
/// ```rust
/// use mosaic_client_core::room::StreamId;
///
/// let id = StreamId::new("stream-42");
/// assert_eq!(id.as_str(), "stream-42");
/// assert_eq!(id.to_string(), "stream-42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamId(String);

impl StreamId {
    /// Create a stream identifier from an SDK-provided value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for StreamId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for StreamId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque handle to a platform video rendering surface
///
/// The SDK adapter mints one handle per renderable stream. The library never
/// inspects the surface; it only hands the token back to the presenter so the
/// host UI can resolve it to an actual view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceHandle(Uuid);

impl SurfaceHandle {
    /// Mint a fresh surface handle
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying handle identifier
    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl Default for SurfaceHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Current phase of the room session lifecycle
///
/// Exactly one value is active at a time, owned exclusively by the
/// [`crate::client::RoomClient`] signal loop.
///
/// # Examples
///
/// ```rust
/// use mosaic_client_core::room::SessionState;
///
/// let state = SessionState::Publishing;
/// assert!(state.is_attached());
/// assert_eq!(state.to_string(), "Publishing");
/// assert!(!SessionState::Connecting.is_attached());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Not attached to any session
    Disconnected,

    /// A connect request is in flight; no media is flowing yet
    Connecting,

    /// Attached to a session; the local stream is not yet confirmed
    Connected,

    /// Attached with a confirmed local published stream
    Publishing,
}

impl SessionState {
    /// Whether the client is attached to a session (`Connected` or `Publishing`)
    ///
    /// Remote streams may only exist while attached.
    pub fn is_attached(&self) -> bool {
        matches!(self, SessionState::Connected | SessionState::Publishing)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Disconnected => write!(f, "Disconnected"),
            SessionState::Connecting => write!(f, "Connecting"),
            SessionState::Connected => write!(f, "Connected"),
            SessionState::Publishing => write!(f, "Publishing"),
        }
    }
}

/// Stream description delivered by the SDK adapter with stream signals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    /// SDK-assigned stream identifier
    pub stream_id: StreamId,
    /// Rendering surface for this stream
    pub surface: SurfaceHandle,
}

impl StreamInfo {
    /// Create a stream description
    pub fn new(stream_id: impl Into<StreamId>, surface: SurfaceHandle) -> Self {
        Self {
            stream_id: stream_id.into(),
            surface,
        }
    }
}

/// A remote participant stream this client is subscribed to
#[derive(Debug, Clone)]
pub struct RemoteStream {
    /// SDK-assigned stream identifier
    pub id: StreamId,
    /// Rendering surface for this stream
    pub surface: SurfaceHandle,
    /// Identifier of our subscription to the stream
    pub subscription_id: Uuid,
    /// When the subscription was issued
    pub subscribed_at: DateTime<Utc>,
}

/// The locally published stream
///
/// Present iff the session state is [`SessionState::Publishing`].
#[derive(Debug, Clone)]
pub struct LocalPublication {
    /// SDK-assigned stream identifier for the local stream
    pub stream_id: StreamId,
    /// Rendering surface for the local preview tile
    pub surface: SurfaceHandle,
    /// When the SDK confirmed the publication
    pub published_at: DateTime<Utc>,
}
