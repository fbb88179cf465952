//! Signal handling for the room client
//!
//! All SDK callbacks funnel into [`RoomClient::handle_signal`], one
//! auditable state-transition function, driven by a single loop task so
//! mutations are serialized regardless of which SDK thread produced the
//! callback.

use std::sync::atomic::Ordering;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::RoomClient;
use crate::error::RoomError;
use crate::events::{EventPriority, RoomEvent, StateChangeInfo, StreamEventInfo};
use crate::room::{LocalPublication, RemoteStream, SessionState, StreamId, StreamInfo};
use crate::transport::SessionSignal;

impl RoomClient {
    /// Signal loop that owns all session state mutation
    pub(crate) async fn run_signal_loop(
        self: std::sync::Arc<Self>,
        mut signal_rx: mpsc::UnboundedReceiver<SessionSignal>,
    ) {
        info!("room signal loop started");

        while let Some(signal) = signal_rx.recv().await {
            if matches!(signal, SessionSignal::Shutdown) {
                break;
            }
            self.handle_signal(signal).await;
        }

        *self.is_running.write().await = false;
        info!("room signal loop ended");
    }

    /// Handle one session signal
    ///
    /// Public so tests and embedders with their own dispatch loop can drive
    /// the state machine directly; production callers should prefer
    /// [`RoomClient::signal_sender`] plus [`RoomClient::start`].
    pub async fn handle_signal(&self, signal: SessionSignal) {
        debug!(?signal, "handling session signal");

        match signal {
            SessionSignal::Connected => self.on_connected().await,
            SessionSignal::Disconnected => self.on_disconnected().await,
            SessionSignal::SessionFailed { message } => self.on_session_failed(message).await,
            SessionSignal::StreamAdded { stream } => self.on_stream_added(stream).await,
            SessionSignal::StreamRemoved { stream_id } => self.on_stream_removed(stream_id).await,
            SessionSignal::SubscriberConnected { stream_id } => {
                self.on_subscriber_connected(stream_id).await
            }
            SessionSignal::PublishConfirmed { stream } => self.on_publish_confirmed(stream).await,
            SessionSignal::PublishFailed { message } => self.on_publish_failed(message).await,
            SessionSignal::PublishLost => self.on_publish_lost().await,
            SessionSignal::Shutdown => {}
        }
    }

    /// Session established: publish, unless the audio device is contended
    /// or a switch was queued while the connect was in flight
    async fn on_connected(&self) {
        let switch_queued = self.switch_queued.swap(false, Ordering::SeqCst);
        let contention = if self.config.audio_guard_enabled {
            self.probe.check()
        } else {
            None
        };

        if switch_queued || contention.is_some() {
            // Flag first: the disconnect signal must find it set.
            self.reconnect_pending.store(true, Ordering::SeqCst);
            if let Some(code) = contention {
                warn!(code, "audio device in use elsewhere, abandoning session");
                self.emit(RoomEvent::AudioContention {
                    code,
                    priority: EventPriority::High,
                })
                .await;
            } else {
                info!("honoring queued switch request, abandoning session");
            }
            if let Err(err) = self.transport.disconnect().await {
                self.emit_error(err).await;
            }
            // State stays Connecting until the disconnect signal arrives.
            return;
        }

        let previous = {
            let mut state = self.state.write().await;
            let previous = *state;
            *state = SessionState::Connected;
            previous
        };
        self.emit_state_change(SessionState::Connected, previous, Some("session connected"))
            .await;

        if let Err(err) = self.transport.publish().await {
            warn!(error = %err, "SDK rejected publish request");
            self.emit_error(err).await;
        }
    }

    /// Session ended: clear all session-scoped state, then reconnect with
    /// the next rotated credentials if a reconnect is pending
    async fn on_disconnected(&self) {
        let previous = {
            let mut state = self.state.write().await;
            let mut local = self.local.write().await;
            let previous = *state;
            *state = SessionState::Disconnected;
            *local = None;
            previous
        };
        self.streams.clear();
        self.tile_order.write().await.clear();
        self.emit_state_change(
            SessionState::Disconnected,
            previous,
            Some("session disconnected"),
        )
        .await;

        // A switch queued during Connecting degenerates into the normal
        // reconnect path when the attempt dissolves without connecting.
        let switch_queued = self.switch_queued.swap(false, Ordering::SeqCst);
        if self.reconnect_pending.swap(false, Ordering::SeqCst) || switch_queued {
            self.total_reconnects.fetch_add(1, Ordering::Relaxed);
            let delay = self.config.reconnect.next_delay();
            if !delay.is_zero() {
                debug!(delay_ms = delay.as_millis() as u64, "delaying reconnect");
                tokio::time::sleep(delay).await;
            }
            info!("reconnecting with next rotated credentials");
            if let Err(err) = self.connect_next().await {
                warn!(error = %err, "automatic reconnect attempt was rejected");
            }
        }
    }

    /// A remote participant started publishing: subscribe, unless the audio
    /// device became contended, in which case abandon the session
    async fn on_stream_added(&self, stream: StreamInfo) {
        let state = *self.state.read().await;
        if !state.is_attached() {
            warn!(stream_id = %stream.stream_id, state = %state, "stream added while detached, ignoring");
            return;
        }
        if self.streams.contains_key(&stream.stream_id) {
            warn!(stream_id = %stream.stream_id, "duplicate stream added signal, ignoring");
            return;
        }

        let contention = if self.config.audio_guard_enabled {
            self.probe.check()
        } else {
            None
        };
        if let Some(code) = contention {
            // Flag first: the disconnect signal must find it set.
            self.reconnect_pending.store(true, Ordering::SeqCst);
            warn!(code, "audio device in use elsewhere, abandoning session");
            self.emit(RoomEvent::AudioContention {
                code,
                priority: EventPriority::High,
            })
            .await;
            // Tearing down the local side cascades into a disconnect; with
            // nothing published yet, disconnect directly.
            let teardown = if self.local.read().await.is_some() {
                self.transport.unpublish().await
            } else {
                self.transport.disconnect().await
            };
            if let Err(err) = teardown {
                self.emit_error(err).await;
            }
            return;
        }

        match self.transport.subscribe(&stream.stream_id).await {
            Ok(()) => {
                let remote = RemoteStream {
                    id: stream.stream_id.clone(),
                    surface: stream.surface,
                    subscription_id: uuid::Uuid::new_v4(),
                    subscribed_at: chrono::Utc::now(),
                };
                info!(stream_id = %remote.id, "subscribed to remote stream");
                self.streams.insert(remote.id.clone(), remote);
                self.tile_order.write().await.push(stream.stream_id.clone());
                self.emit(RoomEvent::StreamAdded {
                    info: StreamEventInfo::new(stream.stream_id, Some(stream.surface)),
                    priority: EventPriority::Normal,
                })
                .await;
            }
            Err(err) => {
                warn!(stream_id = %stream.stream_id, error = %err, "SDK rejected subscribe request");
                self.emit_error(err).await;
            }
        }
    }

    /// A remote stream went away: drop it from the registry and the grid
    async fn on_stream_removed(&self, stream_id: StreamId) {
        if self.streams.remove(&stream_id).is_none() {
            debug!(stream_id = %stream_id, "stream removed signal for unknown stream");
            return;
        }
        self.tile_order.write().await.retain(|id| id != &stream_id);
        info!(stream_id = %stream_id, "remote stream removed");
        self.emit(RoomEvent::StreamRemoved {
            info: StreamEventInfo::new(stream_id, None),
            priority: EventPriority::Normal,
        })
        .await;
    }

    /// A subscription began rendering; the grid tile should refresh
    async fn on_subscriber_connected(&self, stream_id: StreamId) {
        if !self.streams.contains_key(&stream_id) {
            debug!(stream_id = %stream_id, "subscriber connected for unknown stream");
            return;
        }
        self.emit(RoomEvent::SubscriberConnected {
            info: StreamEventInfo::new(stream_id, None),
            priority: EventPriority::Low,
        })
        .await;
    }

    /// The SDK confirmed the local stream: enter Publishing
    async fn on_publish_confirmed(&self, stream: StreamInfo) {
        let previous = {
            let mut state = self.state.write().await;
            let mut local = self.local.write().await;
            let previous = *state;
            if previous != SessionState::Connected {
                warn!(state = %previous, "publish confirmation in unexpected state, ignoring");
                return;
            }
            *local = Some(LocalPublication {
                stream_id: stream.stream_id.clone(),
                surface: stream.surface,
                published_at: chrono::Utc::now(),
            });
            *state = SessionState::Publishing;
            previous
        };
        info!(stream_id = %stream.stream_id, "local stream published");
        self.emit_state_change(SessionState::Publishing, previous, Some("publish confirmed"))
            .await;
        self.emit(RoomEvent::PublishConfirmed {
            info: StreamEventInfo::new(stream.stream_id, Some(stream.surface)),
            priority: EventPriority::High,
        })
        .await;
    }

    /// The publish request failed; the session stays up
    async fn on_publish_failed(&self, message: String) {
        warn!(error = %message, "publish failed");
        self.emit(RoomEvent::Error {
            error: RoomError::connection(format!("publish failed: {message}")),
            priority: EventPriority::High,
        })
        .await;
    }

    /// The local stream was torn down: leave the session
    ///
    /// Mirrors the publisher-destroyed behavior: losing the local stream
    /// always cascades into a full disconnect, which in turn honors any
    /// pending reconnect.
    async fn on_publish_lost(&self) {
        let previous = {
            let mut state = self.state.write().await;
            let mut local = self.local.write().await;
            let previous = *state;
            if previous == SessionState::Disconnected {
                debug!("publish lost signal while disconnected, ignoring");
                return;
            }
            if previous == SessionState::Publishing {
                *state = SessionState::Connected;
            }
            *local = None;
            previous
        };
        info!("local stream torn down");
        self.emit(RoomEvent::PublishLost {
            priority: EventPriority::High,
        })
        .await;
        if previous == SessionState::Publishing {
            self.emit_state_change(SessionState::Connected, previous, Some("publish lost"))
                .await;
        }
        if let Err(err) = self.transport.disconnect().await {
            self.emit_error(err).await;
        }
    }

    /// The SDK reported a session-level failure
    async fn on_session_failed(&self, message: String) {
        warn!(error = %message, "session failed");
        self.emit(RoomEvent::Error {
            error: RoomError::connection(message),
            priority: EventPriority::Critical,
        })
        .await;
    }

    /// Deliver an event to the registered handler and the broadcast mirror
    pub(crate) async fn emit(&self, event: RoomEvent) {
        let handler = self.event_handler.read().await.clone();
        if let Some(handler) = handler {
            handler.on_room_event(event.clone()).await;
        }
        // Send fails only when nobody subscribed, which is fine.
        let _ = self.event_tx.send(event);
    }

    /// Emit a state change event, skipping no-op transitions
    pub(crate) async fn emit_state_change(
        &self,
        new_state: SessionState,
        previous_state: SessionState,
        reason: Option<&str>,
    ) {
        if new_state == previous_state {
            return;
        }
        self.emit(RoomEvent::StateChanged {
            info: StateChangeInfo {
                new_state,
                previous_state,
                reason: reason.map(str::to_string),
                timestamp: chrono::Utc::now(),
            },
            priority: EventPriority::Normal,
        })
        .await;
    }

    /// Surface an error to observers
    pub(crate) async fn emit_error(&self, error: RoomError) {
        self.emit(RoomEvent::Error {
            error,
            priority: EventPriority::High,
        })
        .await;
    }
}
