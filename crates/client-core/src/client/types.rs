//! Type definitions for the room client
//!
//! Small read-side types returned by [`crate::client::RoomClient`] query
//! methods.

use crate::room::SessionState;

/// Snapshot of the client's current state and activity
///
/// # Examples
///
/// ```rust
/// use mosaic_client_core::client::types::ClientStats;
/// use mosaic_client_core::room::SessionState;
///
/// let stats = ClientStats {
///     state: SessionState::Publishing,
///     remote_streams: 2,
///     is_publishing: true,
///     is_running: true,
///     total_connects: 3,
///     total_reconnects: 2,
/// };
///
/// assert_eq!(stats.remote_streams, 2);
/// assert!(stats.is_publishing);
/// ```
#[derive(Debug, Clone)]
pub struct ClientStats {
    /// Current session state
    pub state: SessionState,
    /// Number of remote streams currently subscribed
    pub remote_streams: usize,
    /// Whether the local stream is currently published
    pub is_publishing: bool,
    /// Whether the signal loop is running
    pub is_running: bool,
    /// Connect attempts issued since the client was created
    pub total_connects: u64,
    /// Automatic reconnects performed since the client was created
    pub total_reconnects: u64,
}
