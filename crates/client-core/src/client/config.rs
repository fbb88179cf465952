//! Client configuration structures
//!
//! This module provides the injectable configuration for the room client:
//! the API key, the ordered credential rotation list, the audio guard toggle
//! and the reconnect policy. Configuration is plain data with builder-style
//! `with_*` methods; nothing here touches the network.
//!
//! # Usage Examples
//!
//! ```rust
//! use mosaic_client_core::client::config::{ClientConfig, CredentialPair};
//!
//! let config = ClientConfig::new()
//!     .with_api_key("demo-key")
//!     .with_credential(CredentialPair::new("session-a", "token-a"))
//!     .with_credential(CredentialPair::new("session-b", "token-b"))
//!     .with_audio_guard(true);
//!
//! assert_eq!(config.credentials.len(), 2);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use super::recovery::ReconnectPolicy;
use crate::error::{RoomError, RoomResult};

/// One (session id, token) pair from the rotation list
///
/// Pairs are immutable and consumed round-robin; see
/// [`crate::client::rotation::CredentialRotator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialPair {
    /// Identifier of the session to join
    pub session_id: String,
    /// Access token scoped to that session
    pub token: String,
}

impl CredentialPair {
    /// Create a credential pair
    pub fn new(session_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            token: token.into(),
        }
    }
}

/// Room client configuration
///
/// # Examples
///
/// ```rust
/// use mosaic_client_core::client::config::{ClientConfig, CredentialPair};
///
/// // An empty credential list fails fast at validation time
/// let config = ClientConfig::new().with_api_key("demo-key");
/// assert!(config.validate().is_err());
///
/// let config = config.with_credential(CredentialPair::new("s1", "t1"));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API key identifying this application to the SDK
    pub api_key: String,

    /// Ordered list of credential pairs, rotated with wraparound
    pub credentials: Vec<CredentialPair>,

    /// Whether to probe for device audio contention before publishing
    ///
    /// When disabled the client publishes unconditionally and the
    /// contention gate never fires.
    pub audio_guard_enabled: bool,

    /// Delay policy applied between a disconnect and its automatic reconnect
    pub reconnect: ReconnectPolicy,

    /// Inter-tile spacing used by the grid presenter, in points
    pub grid_spacing: f32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            credentials: Vec::new(),
            audio_guard_enabled: true,
            reconnect: ReconnectPolicy::default(),
            grid_spacing: 8.0,
        }
    }
}

impl ClientConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SDK API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    /// Replace the credential rotation list
    pub fn with_credentials(mut self, credentials: Vec<CredentialPair>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Append one credential pair to the rotation list
    pub fn with_credential(mut self, pair: CredentialPair) -> Self {
        self.credentials.push(pair);
        self
    }

    /// Enable or disable the audio contention guard
    pub fn with_audio_guard(mut self, enabled: bool) -> Self {
        self.audio_guard_enabled = enabled;
        self
    }

    /// Set the reconnect delay policy
    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    /// Set the grid inter-tile spacing
    pub fn with_grid_spacing(mut self, spacing: f32) -> Self {
        self.grid_spacing = spacing;
        self
    }

    /// Validate the configuration
    ///
    /// Fails with [`RoomError::Configuration`] when the API key is empty or
    /// the credential list has no entries; the rotator requires a non-empty
    /// list by construction.
    pub fn validate(&self) -> RoomResult<()> {
        if self.api_key.is_empty() {
            return Err(RoomError::configuration("api_key must not be empty"));
        }
        if self.credentials.is_empty() {
            return Err(RoomError::configuration(
                "credential rotation list must not be empty",
            ));
        }
        Ok(())
    }
}
