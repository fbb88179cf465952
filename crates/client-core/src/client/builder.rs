//! Builder for assembling room clients
//!
//! This module provides a fluent builder interface for constructing a
//! [`RoomClient`] from its injected collaborators: configuration, the SDK
//! transport adapter, the platform audio activator and an optional event
//! handler.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use mosaic_client_core::{RoomClientBuilder, RoomResult, RoomTransport, StreamId};
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
//! let client = RoomClientBuilder::new()
//!     .api_key("demo-key")
//!     .credential("session-a", "token-a")
//!     .credential("session-b", "token-b")
//!     .transport(Arc::new(NoopTransport))
//!     .build()
//!     .expect("valid configuration");
//!
//! assert_eq!(client.config().credentials.len(), 2);
//! ```

use std::sync::Arc;

use super::config::{ClientConfig, CredentialPair};
use super::recovery::ReconnectPolicy;
use super::RoomClient;
use crate::audio::{AudioSessionActivator, NullActivator};
use crate::error::{RoomError, RoomResult};
use crate::events::RoomEventHandler;
use crate::transport::RoomTransport;

/// Fluent builder for [`RoomClient`]
///
/// A transport is required; the audio activator defaults to
/// [`NullActivator`] (no contention semantics) and the event handler may be
/// registered later with [`RoomClient::set_event_handler`].
pub struct RoomClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn RoomTransport>>,
    activator: Option<Arc<dyn AudioSessionActivator>>,
    event_handler: Option<Arc<dyn RoomEventHandler>>,
}

impl RoomClientBuilder {
    /// Start a builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            transport: None,
            activator: None,
            event_handler: None,
        }
    }

    /// Start a builder from an existing configuration
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            transport: None,
            activator: None,
            event_handler: None,
        }
    }

    /// Set the SDK API key
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = api_key.into();
        self
    }

    /// Append one credential pair to the rotation list
    pub fn credential(
        mut self,
        session_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        self.config
            .credentials
            .push(CredentialPair::new(session_id, token));
        self
    }

    /// Replace the credential rotation list
    pub fn credentials(mut self, credentials: Vec<CredentialPair>) -> Self {
        self.config.credentials = credentials;
        self
    }

    /// Enable or disable the audio contention guard
    pub fn audio_guard(mut self, enabled: bool) -> Self {
        self.config.audio_guard_enabled = enabled;
        self
    }

    /// Set the reconnect delay policy
    pub fn reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.config.reconnect = policy;
        self
    }

    /// Set the grid inter-tile spacing
    pub fn grid_spacing(mut self, spacing: f32) -> Self {
        self.config.grid_spacing = spacing;
        self
    }

    /// Set the SDK transport adapter (required)
    pub fn transport(mut self, transport: Arc<dyn RoomTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the platform audio session activator
    pub fn audio_activator(mut self, activator: Arc<dyn AudioSessionActivator>) -> Self {
        self.activator = Some(activator);
        self
    }

    /// Register the application event handler up front
    pub fn event_handler(mut self, handler: Arc<dyn RoomEventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    /// Build the client
    ///
    /// # Errors
    ///
    /// * [`RoomError::Configuration`] - missing transport, empty API key or
    ///   empty credential list
    pub fn build(self) -> RoomResult<Arc<RoomClient>> {
        let transport = self
            .transport
            .ok_or_else(|| RoomError::configuration("a room transport is required"))?;
        let activator = self
            .activator
            .unwrap_or_else(|| Arc::new(NullActivator));
        RoomClient::new(self.config, transport, activator, self.event_handler)
    }
}

impl Default for RoomClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
