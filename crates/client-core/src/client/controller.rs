//! Session lifecycle operations
//!
//! User-facing operations on [`RoomClient`]: connecting with rotated
//! credentials, switching sessions, leaving, and querying the current
//! state. State transitions driven by SDK callbacks live in
//! [`super::signals`].
//!
//! # Re-entrancy rules
//!
//! - `connect` is only legal while `Disconnected`; a second call while a
//!   session is in flight fails with an invalid state error instead of
//!   silently orphaning the first session.
//! - `switch_session` while `Connecting` cannot abort the in-flight connect
//!   (the SDK offers no cancellation), so the request is queued and applied
//!   the moment the attempt resolves.

use std::sync::atomic::Ordering;

use tracing::{info, warn};

use super::types::ClientStats;
use super::RoomClient;
use crate::error::{RoomError, RoomResult};
use crate::room::{LocalPublication, RemoteStream, SessionState};

impl RoomClient {
    /// Connect to the next session in the credential rotation
    ///
    /// The result of the request is observed asynchronously through the
    /// signal channel; `Ok` means the SDK accepted the request, not that
    /// the session is established.
    ///
    /// # Errors
    ///
    /// * [`RoomError::InvalidState`] - a session is already in flight
    /// * [`RoomError::Connection`] - the SDK rejected the request
    pub async fn connect(&self) -> RoomResult<()> {
        let state = *self.state.read().await;
        if state != SessionState::Disconnected {
            return Err(RoomError::invalid_state(format!(
                "connect requested while {state}"
            )));
        }
        self.connect_next().await
    }

    /// Issue a connect with the next rotated credential pair
    ///
    /// Shared by `connect`, the queued-switch path and the automatic
    /// reconnect path; callers guarantee the state is `Disconnected`.
    pub(crate) async fn connect_next(&self) -> RoomResult<()> {
        let pair = {
            let mut rotator = self.rotator.lock().unwrap();
            rotator.next()
        };

        let previous = {
            let mut state = self.state.write().await;
            let previous = *state;
            *state = SessionState::Connecting;
            previous
        };
        self.total_connects.fetch_add(1, Ordering::Relaxed);
        self.emit_state_change(SessionState::Connecting, previous, Some("connect requested"))
            .await;

        info!(session_id = %pair.session_id, "connecting to session");
        if let Err(err) = self
            .transport
            .connect(&self.config.api_key, &pair.session_id, &pair.token)
            .await
        {
            warn!(session_id = %pair.session_id, error = %err, "SDK rejected connect request");
            {
                let mut state = self.state.write().await;
                *state = SessionState::Disconnected;
            }
            self.emit_state_change(
                SessionState::Disconnected,
                SessionState::Connecting,
                Some("connect rejected"),
            )
            .await;
            self.emit_error(err.clone()).await;
            return Err(err);
        }
        Ok(())
    }

    /// Leave the current session and rejoin with the next credentials
    ///
    /// Sets the reconnect flag *before* issuing any teardown request, so the
    /// eventual disconnect signal cannot race past it, then unsubscribes all
    /// remote streams and tears down the local publication. The cascading
    /// destroy callbacks complete the switch.
    ///
    /// While `Connecting` the request is queued (see module docs); while
    /// `Disconnected` it degenerates into a plain connect.
    pub async fn switch_session(&self) -> RoomResult<()> {
        let state = *self.state.read().await;
        match state {
            SessionState::Disconnected => self.connect_next().await,
            SessionState::Connecting => {
                info!("switch requested while connecting; queued until the attempt resolves");
                self.switch_queued.store(true, Ordering::SeqCst);
                Ok(())
            }
            SessionState::Connected | SessionState::Publishing => {
                // Flag first: the disconnect signal must find it set.
                self.reconnect_pending.store(true, Ordering::SeqCst);
                info!(state = %state, "switching session");

                let ids: Vec<_> = self.tile_order.read().await.clone();
                for stream_id in &ids {
                    if let Err(err) = self.transport.unsubscribe(stream_id).await {
                        warn!(stream_id = %stream_id, error = %err, "unsubscribe failed during switch");
                        self.emit_error(err).await;
                    }
                }

                if self.local.read().await.is_some() {
                    if let Err(err) = self.transport.unpublish().await {
                        warn!(error = %err, "unpublish failed during switch, disconnecting directly");
                        self.emit_error(err).await;
                        self.transport.disconnect().await?;
                    }
                } else {
                    self.transport.disconnect().await?;
                }
                Ok(())
            }
        }
    }

    /// Leave the current session without reconnecting
    ///
    /// Clears any pending reconnect or queued switch so the disconnect is
    /// final.
    pub async fn disconnect(&self) -> RoomResult<()> {
        self.reconnect_pending.store(false, Ordering::SeqCst);
        self.switch_queued.store(false, Ordering::SeqCst);
        let state = *self.state.read().await;
        if state == SessionState::Disconnected {
            return Ok(());
        }
        info!(state = %state, "leaving session");
        self.transport.disconnect().await
    }

    /// Current session state
    pub async fn current_state(&self) -> SessionState {
        *self.state.read().await
    }

    /// Whether the local stream is currently published
    pub async fn is_publishing(&self) -> bool {
        *self.state.read().await == SessionState::Publishing
    }

    /// Number of rendered participants: remotes plus the local tile
    ///
    /// Zero until the local publication is confirmed; the grid shows nothing
    /// before this client is itself visible to others.
    pub async fn participant_count(&self) -> usize {
        if self.is_publishing().await {
            self.streams.len() + 1
        } else {
            0
        }
    }

    /// Look up a remote stream by identifier
    ///
    /// # Errors
    ///
    /// * [`RoomError::StreamNotFound`] - no subscription exists for the id
    pub fn remote_stream(&self, stream_id: &crate::room::StreamId) -> RoomResult<RemoteStream> {
        self.streams
            .get(stream_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RoomError::StreamNotFound {
                stream_id: stream_id.to_string(),
            })
    }

    /// Remote streams in tile order (insertion order)
    pub async fn remote_streams(&self) -> Vec<RemoteStream> {
        let order = self.tile_order.read().await;
        order
            .iter()
            .filter_map(|id| self.streams.get(id).map(|entry| entry.value().clone()))
            .collect()
    }

    /// The local publication, if the stream is confirmed
    pub async fn local_publication(&self) -> Option<LocalPublication> {
        self.local.read().await.clone()
    }

    /// Snapshot of client statistics
    pub async fn get_client_stats(&self) -> ClientStats {
        let state = *self.state.read().await;
        ClientStats {
            state,
            remote_streams: self.streams.len(),
            is_publishing: state == SessionState::Publishing,
            is_running: *self.is_running.read().await,
            total_connects: self.total_connects.load(Ordering::Relaxed),
            total_reconnects: self.total_reconnects.load(Ordering::Relaxed),
        }
    }
}
