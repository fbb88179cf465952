//! Event handling for room client operations
//!
//! This module provides the event surface applications consume: session
//! state changes, remote stream membership changes, local publish lifecycle
//! and surfaced errors. Events are delivered to a registered
//! [`RoomEventHandler`] and, in parallel, over a broadcast channel obtained
//! from [`crate::client::RoomClient::subscribe_events`].
//!
//! Transport failures are surfaced here as [`RoomEvent::Error`] instead of
//! being swallowed; automatic reconnection still happens independently of
//! whether anyone is listening.
//!
//! # Usage Examples
//!
//! ```rust
//! use mosaic_client_core::events::{RoomEventHandler, StateChangeInfo};
//! use async_trait::async_trait;
//!
//! struct LoggingHandler;
//!
//! #[async_trait]
//! impl RoomEventHandler for LoggingHandler {
//!     async fn on_state_changed(&self, info: StateChangeInfo) {
//!         println!("session is now {}", info.new_state);
//!     }
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::RoomError;
use crate::room::{SessionState, StreamId, SurfaceHandle};

/// Event priority levels for observer-side filtering
///
/// # Examples
///
/// ```rust
/// use mosaic_client_core::events::EventPriority;
///
/// assert!(EventPriority::Critical > EventPriority::High);
/// assert!(EventPriority::High > EventPriority::Normal);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventPriority {
    /// Routine notifications (tile re-render hints)
    Low,
    /// State changes and stream membership changes
    Normal,
    /// Publish lifecycle changes and recoverable failures
    High,
    /// Session-level failures
    Critical,
}

/// Information about a session state transition
#[derive(Debug, Clone)]
pub struct StateChangeInfo {
    /// New session state after the transition
    pub new_state: SessionState,
    /// State before the transition
    pub previous_state: SessionState,
    /// Reason for the transition, when one is known
    pub reason: Option<String>,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Information about a stream-related event
#[derive(Debug, Clone)]
pub struct StreamEventInfo {
    /// Stream the event relates to
    pub stream_id: StreamId,
    /// Rendering surface, when the event carries one
    pub surface: Option<SurfaceHandle>,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
}

impl StreamEventInfo {
    pub(crate) fn new(stream_id: StreamId, surface: Option<SurfaceHandle>) -> Self {
        Self {
            stream_id,
            surface,
            timestamp: Utc::now(),
        }
    }
}

/// Room client events
///
/// One auditable stream of everything that happens to the session, in the
/// order the signal loop processed it.
#[derive(Debug, Clone)]
pub enum RoomEvent {
    /// Session state changed
    StateChanged {
        /// Details of the transition
        info: StateChangeInfo,
        /// Priority of this event
        priority: EventPriority,
    },
    /// A remote stream was subscribed and joined the grid
    StreamAdded {
        /// Details of the stream
        info: StreamEventInfo,
        /// Priority of this event
        priority: EventPriority,
    },
    /// A remote stream left the grid
    StreamRemoved {
        /// Details of the stream
        info: StreamEventInfo,
        /// Priority of this event
        priority: EventPriority,
    },
    /// A subscribed stream began rendering and its tile should refresh
    SubscriberConnected {
        /// Details of the stream
        info: StreamEventInfo,
        /// Priority of this event
        priority: EventPriority,
    },
    /// The local stream publication was confirmed
    PublishConfirmed {
        /// Details of the local stream
        info: StreamEventInfo,
        /// Priority of this event
        priority: EventPriority,
    },
    /// The local stream publication was torn down
    PublishLost {
        /// Priority of this event
        priority: EventPriority,
    },
    /// The audio device was found held by another process
    ///
    /// The session is being abandoned and will reconnect with the next
    /// credentials; this is a policy gate, not a fatal error.
    AudioContention {
        /// Platform error code that triggered the gate
        code: i32,
        /// Priority of this event
        priority: EventPriority,
    },
    /// A client error occurred
    Error {
        /// The error that occurred
        error: RoomError,
        /// Priority of this event
        priority: EventPriority,
    },
}

impl RoomEvent {
    /// Get the priority of this event
    pub fn priority(&self) -> EventPriority {
        match self {
            RoomEvent::StateChanged { priority, .. } => *priority,
            RoomEvent::StreamAdded { priority, .. } => *priority,
            RoomEvent::StreamRemoved { priority, .. } => *priority,
            RoomEvent::SubscriberConnected { priority, .. } => *priority,
            RoomEvent::PublishConfirmed { priority, .. } => *priority,
            RoomEvent::PublishLost { priority } => *priority,
            RoomEvent::AudioContention { priority, .. } => *priority,
            RoomEvent::Error { priority, .. } => *priority,
        }
    }

    /// Get the stream ID associated with this event, if any
    pub fn stream_id(&self) -> Option<&StreamId> {
        match self {
            RoomEvent::StreamAdded { info, .. } => Some(&info.stream_id),
            RoomEvent::StreamRemoved { info, .. } => Some(&info.stream_id),
            RoomEvent::SubscriberConnected { info, .. } => Some(&info.stream_id),
            RoomEvent::PublishConfirmed { info, .. } => Some(&info.stream_id),
            _ => None,
        }
    }
}

/// Handler for room client events
///
/// Implement this trait to receive session lifecycle notifications. Only
/// [`on_state_changed`](RoomEventHandler::on_state_changed) is required;
/// the remaining methods default to no-ops.
#[async_trait]
pub trait RoomEventHandler: Send + Sync {
    /// Handle a session state transition
    async fn on_state_changed(&self, info: StateChangeInfo);

    /// Handle a remote stream joining the grid
    async fn on_stream_added(&self, _info: StreamEventInfo) {}

    /// Handle a remote stream leaving the grid
    async fn on_stream_removed(&self, _info: StreamEventInfo) {}

    /// Handle a subscribed stream starting to render
    async fn on_subscriber_connected(&self, _info: StreamEventInfo) {}

    /// Handle confirmation of the local publication
    async fn on_publish_confirmed(&self, _info: StreamEventInfo) {}

    /// Handle teardown of the local publication
    async fn on_publish_lost(&self) {}

    /// Handle an audio contention gate firing
    async fn on_audio_contention(&self, _code: i32) {}

    /// Handle a surfaced client error
    async fn on_error(&self, _error: RoomError) {}

    /// Unified event entry point
    ///
    /// Dispatches to the specific methods above. Override only for custom
    /// routing logic.
    async fn on_room_event(&self, event: RoomEvent) {
        match event {
            RoomEvent::StateChanged { info, .. } => self.on_state_changed(info).await,
            RoomEvent::StreamAdded { info, .. } => self.on_stream_added(info).await,
            RoomEvent::StreamRemoved { info, .. } => self.on_stream_removed(info).await,
            RoomEvent::SubscriberConnected { info, .. } => {
                self.on_subscriber_connected(info).await
            }
            RoomEvent::PublishConfirmed { info, .. } => self.on_publish_confirmed(info).await,
            RoomEvent::PublishLost { .. } => self.on_publish_lost().await,
            RoomEvent::AudioContention { code, .. } => self.on_audio_contention(code).await,
            RoomEvent::Error { error, .. } => self.on_error(error).await,
        }
    }
}
