//! Session transport boundary
//!
//! The room client never talks to the network itself. The host application
//! wires in an adapter over the actual communications SDK: outbound requests
//! go through the [`RoomTransport`] trait, and SDK callbacks come back as
//! [`SessionSignal`] values pushed into the client's signal channel.
//!
//! Signals may originate on arbitrary SDK-internal threads; the channel
//! serializes them onto the single signal loop that owns all session state.

use async_trait::async_trait;

use crate::error::RoomResult;
use crate::room::{StreamId, StreamInfo};

/// Lifecycle signals delivered by the SDK adapter
///
/// Each variant corresponds to one callback of the underlying SDK. The
/// adapter translates callbacks into signals and sends them through the
/// sender returned by [`crate::client::RoomClient::signal_sender`].
#[derive(Debug, Clone)]
pub enum SessionSignal {
    /// The session connection was established
    Connected,

    /// The session connection ended
    Disconnected,

    /// The session failed with an SDK-reported error
    SessionFailed {
        /// SDK error description
        message: String,
    },

    /// A remote participant started publishing a stream
    StreamAdded {
        /// Description of the new stream
        stream: StreamInfo,
    },

    /// A remote participant stream went away
    StreamRemoved {
        /// Identifier of the removed stream
        stream_id: StreamId,
    },

    /// A subscription started receiving media and its tile should render
    SubscriberConnected {
        /// Identifier of the subscribed stream
        stream_id: StreamId,
    },

    /// The SDK confirmed creation of the local published stream
    PublishConfirmed {
        /// Description of the local stream
        stream: StreamInfo,
    },

    /// The local publish request failed
    PublishFailed {
        /// SDK error description
        message: String,
    },

    /// The local published stream was torn down
    PublishLost,

    /// Internal stop marker emitted by [`crate::client::RoomClient::stop`]
    ///
    /// SDK adapters must not send this variant.
    Shutdown,
}

/// Outbound requests to the communications SDK
///
/// Implementations wrap the actual SDK session object. All methods are
/// fire-and-forget from the controller's perspective: the outcome of a
/// request is observed asynchronously through [`SessionSignal`]s, and an
/// `Err` here means the SDK refused the request outright.
///
/// Implementations must be safe to call from multiple tasks; the controller
/// issues requests both from its signal loop and from user-facing operations.
#[async_trait]
pub trait RoomTransport: Send + Sync {
    /// Request a connection to the session identified by `session_id`
    async fn connect(&self, api_key: &str, session_id: &str, token: &str) -> RoomResult<()>;

    /// Request disconnection from the current session
    async fn disconnect(&self) -> RoomResult<()>;

    /// Request publication of the local audio/video stream
    async fn publish(&self) -> RoomResult<()>;

    /// Request teardown of the local published stream
    async fn unpublish(&self) -> RoomResult<()>;

    /// Request a subscription to a remote stream
    async fn subscribe(&self, stream_id: &StreamId) -> RoomResult<()>;

    /// Request removal of a subscription to a remote stream
    async fn unsubscribe(&self, stream_id: &StreamId) -> RoomResult<()>;
}
