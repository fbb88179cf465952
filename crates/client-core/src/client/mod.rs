//! Room client coordination layer
//!
//! [`RoomClient`] owns all session-scoped state: the lifecycle state
//! machine, the remote stream registry, the local publication and the
//! reconnect bookkeeping. SDK callbacks reach it as [`SessionSignal`]s over
//! an mpsc channel drained by a single signal loop, so every mutation is
//! serialized no matter which thread the SDK calls back on.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐     signals      ┌──────────────────────┐
//! │    SDK adapter       │ ───────────────▶ │      RoomClient      │
//! │ (host application)   │                  │  signal loop owns:   │
//! │                      │ ◀─────────────── │  state / streams /   │
//! └──────────────────────┘    transport     │  reconnect flag      │
//!                              requests     └──────────┬───────────┘
//!                                                      │ events
//!                                                      ▼
//!                                        RoomEventHandler + broadcast
//! ```

pub mod builder;
pub mod config;
pub mod controller;
pub mod recovery;
pub mod rotation;
pub mod signals;
pub mod types;

#[cfg(test)]
mod tests;

pub use builder::RoomClientBuilder;
pub use config::{ClientConfig, CredentialPair};
pub use recovery::ReconnectPolicy;
pub use rotation::CredentialRotator;
pub use types::ClientStats;

use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::{Arc, Mutex as StdMutex};

use dashmap::DashMap;
use tokio::sync::{broadcast, mpsc, RwLock};

use crate::audio::{AudioContentionProbe, AudioSessionActivator};
use crate::error::RoomResult;
use crate::events::{RoomEvent, RoomEventHandler};
use crate::room::{LocalPublication, RemoteStream, SessionState, StreamId};
use crate::transport::{RoomTransport, SessionSignal};

/// Capacity of the broadcast channel events are mirrored onto
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Session lifecycle controller for a multiparty room
///
/// Created through [`RoomClientBuilder`]. Clone-free: the client lives in an
/// `Arc` and is shared by reference.
pub struct RoomClient {
    /// Injected configuration (API key, credential list, policies)
    pub(crate) config: ClientConfig,

    /// Outbound requests to the communications SDK
    pub(crate) transport: Arc<dyn RoomTransport>,

    /// Device audio contention probe
    pub(crate) probe: AudioContentionProbe,

    /// Round-robin credential supplier
    pub(crate) rotator: StdMutex<CredentialRotator>,

    /// Current session state; mutated only by the signal loop and guarded
    /// connect/teardown operations
    pub(crate) state: RwLock<SessionState>,

    /// Remote stream registry keyed by stream id
    pub(crate) streams: DashMap<StreamId, RemoteStream>,

    /// Tile ordering for the grid: insertion order of remote streams
    pub(crate) tile_order: RwLock<Vec<StreamId>>,

    /// Local publication, present iff state is Publishing
    pub(crate) local: RwLock<Option<LocalPublication>>,

    /// Set before a teardown whose completion should trigger a reconnect
    pub(crate) reconnect_pending: AtomicBool,

    /// A switch request arrived while Connecting and waits for resolution
    pub(crate) switch_queued: AtomicBool,

    /// Application event handler, if registered
    pub(crate) event_handler: RwLock<Option<Arc<dyn RoomEventHandler>>>,

    /// Broadcast mirror of every emitted event
    pub(crate) event_tx: broadcast::Sender<RoomEvent>,

    /// Sender half of the signal channel, cloned out to SDK adapters
    pub(crate) signal_tx: mpsc::UnboundedSender<SessionSignal>,

    /// Receiver half, taken once by `start`
    pub(crate) signal_rx: StdMutex<Option<mpsc::UnboundedReceiver<SessionSignal>>>,

    /// Whether the signal loop is running
    pub(crate) is_running: RwLock<bool>,

    /// Connect attempts issued since creation
    pub(crate) total_connects: AtomicU64,

    /// Automatic reconnects performed since creation
    pub(crate) total_reconnects: AtomicU64,
}

impl std::fmt::Debug for RoomClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomClient")
            .field("config", &self.config)
            .field("streams", &self.streams.len())
            .finish()
    }
}

impl RoomClient {
    /// Create a room client from validated parts
    ///
    /// Prefer [`RoomClientBuilder`]; this constructor is the common funnel.
    /// Fails with [`crate::error::RoomError::Configuration`] when the
    /// configuration does not validate.
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn RoomTransport>,
        activator: Arc<dyn AudioSessionActivator>,
        event_handler: Option<Arc<dyn RoomEventHandler>>,
    ) -> RoomResult<Arc<Self>> {
        config.validate()?;
        let rotator = CredentialRotator::new(config.credentials.clone())?;
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();

        Ok(Arc::new(Self {
            config,
            transport,
            probe: AudioContentionProbe::new(activator),
            rotator: StdMutex::new(rotator),
            state: RwLock::new(SessionState::Disconnected),
            streams: DashMap::new(),
            tile_order: RwLock::new(Vec::new()),
            local: RwLock::new(None),
            reconnect_pending: AtomicBool::new(false),
            switch_queued: AtomicBool::new(false),
            event_handler: RwLock::new(event_handler),
            event_tx,
            signal_tx,
            signal_rx: StdMutex::new(Some(signal_rx)),
            is_running: RwLock::new(false),
            total_connects: AtomicU64::new(0),
            total_reconnects: AtomicU64::new(0),
        }))
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Register the application event handler
    pub async fn set_event_handler(&self, handler: Arc<dyn RoomEventHandler>) {
        *self.event_handler.write().await = Some(handler);
    }

    /// Subscribe to the broadcast mirror of the event stream
    ///
    /// Multiple receivers may subscribe independently; slow receivers see
    /// lagged-channel errors rather than stalling the client.
    pub fn subscribe_events(&self) -> broadcast::Receiver<RoomEvent> {
        self.event_tx.subscribe()
    }

    /// Obtain a sender for SDK adapters to deliver [`SessionSignal`]s
    pub fn signal_sender(&self) -> mpsc::UnboundedSender<SessionSignal> {
        self.signal_tx.clone()
    }

    /// Start the signal loop
    ///
    /// Spawns the task that drains the signal channel. May be called once;
    /// a second call fails with an invalid state error.
    pub async fn start(self: &Arc<Self>) -> RoomResult<()> {
        let rx = self
            .signal_rx
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| crate::error::RoomError::invalid_state("signal loop already started"))?;
        *self.is_running.write().await = true;
        let client = Arc::clone(self);
        tokio::spawn(client.run_signal_loop(rx));
        Ok(())
    }

    /// Stop the signal loop
    ///
    /// Pending signals queued before the stop marker are still processed.
    pub async fn stop(&self) -> RoomResult<()> {
        let _ = self.signal_tx.send(SessionSignal::Shutdown);
        Ok(())
    }
}
