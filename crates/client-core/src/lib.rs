//! # Mosaic Client Core - Multiparty Room Client Coordination Layer
//!
//! This crate coordinates a client's participation in a multiparty
//! audio/video room on top of an externally supplied communications SDK:
//!
//! - **Session lifecycle**: connect → publish → subscribe → teardown →
//!   reconnect, driven by SDK callbacks serialized onto one signal loop
//! - **Credential rotation**: sessions are joined round-robin from a fixed
//!   ordered list of (session id, token) pairs
//! - **Audio contention guard**: the device audio session is probed before
//!   publishing; a device held by another process abandons the session and
//!   reconnects with the next credentials
//! - **Participant grid**: a read-side presenter maps session state to an
//!   ordered list of video tiles
//!
//! Signaling, media transport and encoding are entirely the SDK's business;
//! this crate only talks to it through the [`RoomTransport`] port and the
//! [`SessionSignal`] channel.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use mosaic_client_core::{
//!     RoomClientBuilder, RoomResult, RoomTransport, SessionSignal, SessionState, StreamId,
//! };
//!
//! struct NoopTransport;
//!
//! #[async_trait]
//! impl RoomTransport for NoopTransport {
//!     async fn connect(&self, _: &str, _: &str, _: &str) -> RoomResult<()> { Ok(()) }
//!     async fn disconnect(&self) -> RoomResult<()> { Ok(()) }
//!     async fn publish(&self) -> RoomResult<()> { Ok(()) }
//!     async fn unpublish(&self) -> RoomResult<()> { Ok(()) }
//!     async fn subscribe(&self, _: &StreamId) -> RoomResult<()> { Ok(()) }
//!     async fn unsubscribe(&self, _: &StreamId) -> RoomResult<()> { Ok(()) }
//! }
//!
//! # tokio_test::block_on(async {
//! let client = RoomClientBuilder::new()
//!     .api_key("demo-key")
//!     .credential("session-a", "token-a")
//!     .credential("session-b", "token-b")
//!     .transport(Arc::new(NoopTransport))
//!     .build()
//!     .expect("valid configuration");
//!
//! client.connect().await.expect("SDK accepted the request");
//!
//! // The SDK adapter would deliver this through client.signal_sender();
//! // tests and examples may drive the state machine directly.
//! client.handle_signal(SessionSignal::Connected).await;
//! assert_eq!(client.current_state().await, SessionState::Connected);
//! # })
//! ```

#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/mosaic-client-core/0.1.0")]

pub mod audio;
pub mod client;
pub mod error;
pub mod events;
pub mod presenter;
pub mod room;
pub mod transport;

// Re-export main types
pub use audio::{
    ActivationError, AudioContentionProbe, AudioSessionActivator, AudioSessionCategory,
    MockActivator, NullActivator, CODE_INITIALIZATION_ERROR, CODE_INSUFFICIENT_PRIORITY,
};
pub use client::{
    ClientConfig, ClientStats, CredentialPair, CredentialRotator, ReconnectPolicy, RoomClient,
    RoomClientBuilder,
};
pub use error::{RoomError, RoomResult};
pub use events::{EventPriority, RoomEvent, RoomEventHandler, StateChangeInfo, StreamEventInfo};
pub use presenter::{ParticipantGridPresenter, ParticipantTile, TileGeometry, TILE_ASPECT_RATIO};
pub use room::{
    LocalPublication, RemoteStream, SessionState, StreamId, StreamInfo, SurfaceHandle,
};
pub use transport::{RoomTransport, SessionSignal};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
