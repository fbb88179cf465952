//! Shared test infrastructure for integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use mosaic_client_core::{
    RoomClient, RoomError, RoomEventHandler, RoomResult, RoomTransport, SessionState,
    StateChangeInfo, StreamEventInfo, StreamId,
};

/// Outbound SDK request recorded by [`MockTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Connect {
        api_key: String,
        session_id: String,
        token: String,
    },
    Disconnect,
    Publish,
    Unpublish,
    Subscribe(StreamId),
    Unsubscribe(StreamId),
}

/// Transport double that records every request
#[derive(Default)]
pub struct MockTransport {
    commands: Mutex<Vec<Command>>,
    reject_connect: Mutex<Option<String>>,
    reject_subscribe: Mutex<Option<String>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }

    pub fn last_command(&self) -> Option<Command> {
        self.commands.lock().unwrap().last().cloned()
    }

    pub fn connect_requests(&self) -> Vec<String> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                Command::Connect { session_id, .. } => Some(session_id),
                _ => None,
            })
            .collect()
    }

    pub fn reject_next_connect(&self, message: &str) {
        *self.reject_connect.lock().unwrap() = Some(message.to_string());
    }

    pub fn reject_next_subscribe(&self, message: &str) {
        *self.reject_subscribe.lock().unwrap() = Some(message.to_string());
    }

    fn record(&self, command: Command) {
        self.commands.lock().unwrap().push(command);
    }
}

#[async_trait]
impl RoomTransport for MockTransport {
    async fn connect(&self, api_key: &str, session_id: &str, token: &str) -> RoomResult<()> {
        self.record(Command::Connect {
            api_key: api_key.to_string(),
            session_id: session_id.to_string(),
            token: token.to_string(),
        });
        if let Some(message) = self.reject_connect.lock().unwrap().take() {
            return Err(RoomError::connection(message));
        }
        Ok(())
    }

    async fn disconnect(&self) -> RoomResult<()> {
        self.record(Command::Disconnect);
        Ok(())
    }

    async fn publish(&self) -> RoomResult<()> {
        self.record(Command::Publish);
        Ok(())
    }

    async fn unpublish(&self) -> RoomResult<()> {
        self.record(Command::Unpublish);
        Ok(())
    }

    async fn subscribe(&self, stream_id: &StreamId) -> RoomResult<()> {
        self.record(Command::Subscribe(stream_id.clone()));
        if let Some(message) = self.reject_subscribe.lock().unwrap().take() {
            return Err(RoomError::connection(message));
        }
        Ok(())
    }

    async fn unsubscribe(&self, stream_id: &StreamId) -> RoomResult<()> {
        self.record(Command::Unsubscribe(stream_id.clone()));
        Ok(())
    }
}

/// Event handler that tracks everything it sees as readable labels
#[derive(Default)]
pub struct TrackingHandler {
    events: Arc<tokio::sync::Mutex<Vec<String>>>,
}

impl TrackingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<String> {
        self.events.lock().await.clone()
    }

    async fn push(&self, label: String) {
        self.events.lock().await.push(label);
    }
}

#[async_trait]
impl RoomEventHandler for TrackingHandler {
    async fn on_state_changed(&self, info: StateChangeInfo) {
        self.push(format!(
            "state:{}->{}",
            info.previous_state, info.new_state
        ))
        .await;
    }

    async fn on_stream_added(&self, info: StreamEventInfo) {
        self.push(format!("stream_added:{}", info.stream_id)).await;
    }

    async fn on_stream_removed(&self, info: StreamEventInfo) {
        self.push(format!("stream_removed:{}", info.stream_id)).await;
    }

    async fn on_subscriber_connected(&self, info: StreamEventInfo) {
        self.push(format!("subscriber_connected:{}", info.stream_id))
            .await;
    }

    async fn on_publish_confirmed(&self, info: StreamEventInfo) {
        self.push(format!("publish_confirmed:{}", info.stream_id))
            .await;
    }

    async fn on_publish_lost(&self) {
        self.push("publish_lost".to_string()).await;
    }

    async fn on_audio_contention(&self, code: i32) {
        self.push(format!("audio_contention:{code}")).await;
    }

    async fn on_error(&self, error: RoomError) {
        self.push(format!("error:{error}")).await;
    }
}

/// Poll until the client reaches `target` or the timeout elapses
pub async fn wait_for_state(client: &RoomClient, target: SessionState) {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if client.current_state().await == target {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for state {target}"));
}
