//! Grid demo: a simulated SDK driving the room client
//!
//! Wires a `RoomClient` to an in-process fake of the communications SDK,
//! joins a session, lets two remote participants appear, renders the grid
//! and then switches to the next session in the rotation.
//!
//! Run with: cargo run --example grid_demo

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use mosaic_client_core::{
    MockActivator, ParticipantGridPresenter, RoomClientBuilder, RoomResult, RoomTransport,
    SessionSignal, StreamId, StreamInfo, SurfaceHandle,
};

/// In-process SDK fake: every accepted request is confirmed by the matching
/// callback signal, like the real SDK would do over the network.
struct SimulatedSdk {
    signals: Mutex<Option<UnboundedSender<SessionSignal>>>,
}

impl SimulatedSdk {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            signals: Mutex::new(None),
        })
    }

    fn attach(&self, signals: UnboundedSender<SessionSignal>) {
        *self.signals.lock().unwrap() = Some(signals);
    }

    fn send(&self, signal: SessionSignal) {
        if let Some(signals) = self.signals.lock().unwrap().as_ref() {
            let _ = signals.send(signal);
        }
    }

    /// Simulate a remote participant starting to publish
    fn remote_joined(&self, stream_id: &str) {
        self.send(SessionSignal::StreamAdded {
            stream: StreamInfo::new(stream_id, SurfaceHandle::new()),
        });
    }
}

#[async_trait]
impl RoomTransport for SimulatedSdk {
    async fn connect(&self, _api_key: &str, session_id: &str, _token: &str) -> RoomResult<()> {
        println!("[sdk] connect requested for {session_id}");
        self.send(SessionSignal::Connected);
        Ok(())
    }

    async fn disconnect(&self) -> RoomResult<()> {
        println!("[sdk] disconnect requested");
        self.send(SessionSignal::Disconnected);
        Ok(())
    }

    async fn publish(&self) -> RoomResult<()> {
        println!("[sdk] publish requested");
        self.send(SessionSignal::PublishConfirmed {
            stream: StreamInfo::new("local", SurfaceHandle::new()),
        });
        Ok(())
    }

    async fn unpublish(&self) -> RoomResult<()> {
        println!("[sdk] unpublish requested");
        self.send(SessionSignal::PublishLost);
        Ok(())
    }

    async fn subscribe(&self, stream_id: &StreamId) -> RoomResult<()> {
        println!("[sdk] subscribe requested for {stream_id}");
        self.send(SessionSignal::SubscriberConnected {
            stream_id: stream_id.clone(),
        });
        Ok(())
    }

    async fn unsubscribe(&self, stream_id: &StreamId) -> RoomResult<()> {
        println!("[sdk] unsubscribe requested for {stream_id}");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let sdk = SimulatedSdk::new();
    let client = RoomClientBuilder::new()
        .api_key("demo-key")
        .credential("session-a", "token-a")
        .credential("session-b", "token-b")
        .transport(sdk.clone())
        .audio_activator(Arc::new(MockActivator::new()))
        .build()?;
    sdk.attach(client.signal_sender());

    client.start().await?;
    client.connect().await?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    sdk.remote_joined("alice");
    sdk.remote_joined("bob");
    tokio::time::sleep(Duration::from_millis(100)).await;

    let presenter = ParticipantGridPresenter::new(client.clone());
    let geometry = presenter.tile_geometry(390.0);
    println!(
        "grid: {} participants, tiles {:.0}x{:.0}",
        presenter.participant_count().await,
        geometry.width,
        geometry.height
    );
    for tile in presenter.tiles().await {
        let kind = if tile.is_local { "local" } else { "remote" };
        println!("  tile {} ({kind}): stream {}", tile.index, tile.stream_id);
    }

    println!("switching session...");
    client.switch_session().await?;
    tokio::time::sleep(Duration::from_millis(200)).await;

    let stats = client.get_client_stats().await;
    println!(
        "state: {}, connects: {}, reconnects: {}",
        stats.state, stats.total_connects, stats.total_reconnects
    );

    client.stop().await?;
    Ok(())
}
