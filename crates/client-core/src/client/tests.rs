//! Unit tests for the session lifecycle controller
//!
//! These drive the state machine through `handle_signal` directly, with a
//! recording transport double standing in for the communications SDK.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::audio::{MockActivator, CODE_INSUFFICIENT_PRIORITY};
use crate::client::{RoomClient, RoomClientBuilder};
use crate::error::{RoomError, RoomResult};
use crate::room::{SessionState, StreamId, StreamInfo, SurfaceHandle};
use crate::transport::{RoomTransport, SessionSignal};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
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

#[derive(Default)]
struct RecordingTransport {
    commands: Mutex<Vec<Command>>,
    reject_connect: Mutex<Option<String>>,
}

impl RecordingTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }

    fn last_command(&self) -> Option<Command> {
        self.commands.lock().unwrap().last().cloned()
    }

    fn connect_requests(&self) -> Vec<String> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                Command::Connect { session_id, .. } => Some(session_id),
                _ => None,
            })
            .collect()
    }

    fn reject_next_connect(&self, message: &str) {
        *self.reject_connect.lock().unwrap() = Some(message.to_string());
    }

    fn record(&self, command: Command) {
        self.commands.lock().unwrap().push(command);
    }
}

#[async_trait]
impl RoomTransport for RecordingTransport {
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
        Ok(())
    }

    async fn unsubscribe(&self, stream_id: &StreamId) -> RoomResult<()> {
        self.record(Command::Unsubscribe(stream_id.clone()));
        Ok(())
    }
}

fn build_client(
    transport: Arc<RecordingTransport>,
    activator: Arc<MockActivator>,
) -> Arc<RoomClient> {
    RoomClientBuilder::new()
        .api_key("test-key")
        .credential("session-0", "token-0")
        .credential("session-1", "token-1")
        .credential("session-2", "token-2")
        .transport(transport)
        .audio_activator(activator)
        .build()
        .expect("test configuration is valid")
}

async fn establish_publishing(client: &RoomClient) {
    client.connect().await.expect("connect accepted");
    client.handle_signal(SessionSignal::Connected).await;
    client
        .handle_signal(SessionSignal::PublishConfirmed {
            stream: StreamInfo::new("local", SurfaceHandle::new()),
        })
        .await;
}

#[tokio::test]
async fn connect_uses_first_rotated_pair() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    client.connect().await.unwrap();

    assert_eq!(client.current_state().await, SessionState::Connecting);
    assert_eq!(
        transport.last_command(),
        Some(Command::Connect {
            api_key: "test-key".to_string(),
            session_id: "session-0".to_string(),
            token: "token-0".to_string(),
        })
    );
}

#[tokio::test]
async fn second_connect_while_in_flight_is_rejected() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    client.connect().await.unwrap();
    let err = client.connect().await.unwrap_err();
    assert!(matches!(err, RoomError::InvalidState { .. }));

    // Only one connect reached the SDK, with the first pair.
    assert_eq!(transport.connect_requests(), vec!["session-0".to_string()]);
}

#[tokio::test]
async fn rejected_connect_surfaces_error_and_returns_to_disconnected() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));
    transport.reject_next_connect("no route to session");

    let err = client.connect().await.unwrap_err();
    assert!(matches!(err, RoomError::Connection { .. }));
    assert_eq!(client.current_state().await, SessionState::Disconnected);

    // The rotation still advanced, so a retry uses the next pair.
    client.connect().await.unwrap();
    assert_eq!(
        transport.connect_requests(),
        vec!["session-0".to_string(), "session-1".to_string()]
    );
}

#[tokio::test]
async fn connected_with_free_audio_publishes() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    client.connect().await.unwrap();
    client.handle_signal(SessionSignal::Connected).await;

    assert_eq!(client.current_state().await, SessionState::Connected);
    assert_eq!(transport.last_command(), Some(Command::Publish));
    // Not publishing until the SDK confirms the stream.
    assert!(!client.is_publishing().await);
    assert_eq!(client.participant_count().await, 0);
}

#[tokio::test]
async fn connected_with_busy_audio_abandons_session_and_reconnects() {
    let transport = RecordingTransport::new();
    let activator = Arc::new(MockActivator::new());
    let client = build_client(transport.clone(), activator.clone());

    client.connect().await.unwrap();
    activator.fail_with(CODE_INSUFFICIENT_PRIORITY, "held by another app");
    client.handle_signal(SessionSignal::Connected).await;

    // Abort path: disconnect requested, never published, still Connecting.
    assert_eq!(transport.last_command(), Some(Command::Disconnect));
    assert!(!transport.commands().contains(&Command::Publish));
    assert_eq!(client.current_state().await, SessionState::Connecting);

    // The disconnect completion consumes the flag and rotates credentials.
    activator.succeed();
    client.handle_signal(SessionSignal::Disconnected).await;
    assert_eq!(
        transport.connect_requests(),
        vec!["session-0".to_string(), "session-1".to_string()]
    );

    let stats = client.get_client_stats().await;
    assert_eq!(stats.total_connects, 2);
    assert_eq!(stats.total_reconnects, 1);
}

#[tokio::test]
async fn publish_confirmation_enters_publishing() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    establish_publishing(&client).await;

    assert_eq!(client.current_state().await, SessionState::Publishing);
    assert!(client.local_publication().await.is_some());
    assert_eq!(client.participant_count().await, 1);
}

#[tokio::test]
async fn publishing_iff_local_stream_exists() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    assert!(client.local_publication().await.is_none());
    assert!(!client.is_publishing().await);

    establish_publishing(&client).await;
    assert!(client.local_publication().await.is_some());
    assert!(client.is_publishing().await);

    client.handle_signal(SessionSignal::PublishLost).await;
    assert!(client.local_publication().await.is_none());
    assert!(!client.is_publishing().await);
}

#[tokio::test]
async fn publish_confirmation_while_disconnected_is_ignored() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    client
        .handle_signal(SessionSignal::PublishConfirmed {
            stream: StreamInfo::new("stale", SurfaceHandle::new()),
        })
        .await;

    assert_eq!(client.current_state().await, SessionState::Disconnected);
    assert!(client.local_publication().await.is_none());
}

#[tokio::test]
async fn stream_added_subscribes_and_registers() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    establish_publishing(&client).await;
    client
        .handle_signal(SessionSignal::StreamAdded {
            stream: StreamInfo::new("s1", SurfaceHandle::new()),
        })
        .await;

    assert!(transport
        .commands()
        .contains(&Command::Subscribe(StreamId::new("s1"))));
    assert_eq!(client.participant_count().await, 2);
    assert_eq!(client.remote_streams().await.len(), 1);
}

#[tokio::test]
async fn stream_added_while_disconnected_is_ignored() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    client
        .handle_signal(SessionSignal::StreamAdded {
            stream: StreamInfo::new("s1", SurfaceHandle::new()),
        })
        .await;

    assert!(transport.commands().is_empty());
    assert_eq!(client.remote_streams().await.len(), 0);
}

#[tokio::test]
async fn stream_added_with_busy_audio_unpublishes_and_flags_reconnect() {
    let transport = RecordingTransport::new();
    let activator = Arc::new(MockActivator::new());
    let client = build_client(transport.clone(), activator.clone());

    establish_publishing(&client).await;
    activator.fail_with(CODE_INSUFFICIENT_PRIORITY, "held by another app");
    client
        .handle_signal(SessionSignal::StreamAdded {
            stream: StreamInfo::new("s1", SurfaceHandle::new()),
        })
        .await;

    // Local teardown requested instead of a subscription.
    assert_eq!(transport.last_command(), Some(Command::Unpublish));
    assert_eq!(client.remote_streams().await.len(), 0);

    // Cascade: publish lost -> disconnect -> reconnect with next pair.
    activator.succeed();
    client.handle_signal(SessionSignal::PublishLost).await;
    client.handle_signal(SessionSignal::Disconnected).await;
    assert_eq!(
        transport.connect_requests(),
        vec!["session-0".to_string(), "session-1".to_string()]
    );
}

#[tokio::test]
async fn remote_stream_lookup_by_id() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    establish_publishing(&client).await;
    client
        .handle_signal(SessionSignal::StreamAdded {
            stream: StreamInfo::new("s1", SurfaceHandle::new()),
        })
        .await;

    assert!(client.remote_stream(&StreamId::new("s1")).is_ok());
    let err = client.remote_stream(&StreamId::new("nope")).unwrap_err();
    assert!(matches!(err, RoomError::StreamNotFound { .. }));
}

#[tokio::test]
async fn stream_removed_shrinks_the_grid() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    establish_publishing(&client).await;
    for id in ["s1", "s2"] {
        client
            .handle_signal(SessionSignal::StreamAdded {
                stream: StreamInfo::new(id, SurfaceHandle::new()),
            })
            .await;
    }
    assert_eq!(client.participant_count().await, 3);

    client
        .handle_signal(SessionSignal::StreamRemoved {
            stream_id: StreamId::new("s1"),
        })
        .await;

    assert_eq!(client.participant_count().await, 2);
    let remaining = client.remote_streams().await;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, StreamId::new("s2"));
}

#[tokio::test]
async fn publish_lost_cascades_into_disconnect() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    establish_publishing(&client).await;
    client.handle_signal(SessionSignal::PublishLost).await;

    assert_eq!(transport.last_command(), Some(Command::Disconnect));
    assert_eq!(client.current_state().await, SessionState::Connected);

    // No reconnect flag was set, so the disconnect is final.
    client.handle_signal(SessionSignal::Disconnected).await;
    assert_eq!(client.current_state().await, SessionState::Disconnected);
    assert_eq!(transport.connect_requests(), vec!["session-0".to_string()]);
}

#[tokio::test]
async fn disconnect_clears_session_scoped_state() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    establish_publishing(&client).await;
    client
        .handle_signal(SessionSignal::StreamAdded {
            stream: StreamInfo::new("s1", SurfaceHandle::new()),
        })
        .await;

    client.handle_signal(SessionSignal::Disconnected).await;

    assert_eq!(client.current_state().await, SessionState::Disconnected);
    assert!(client.local_publication().await.is_none());
    assert_eq!(client.remote_streams().await.len(), 0);
    assert_eq!(client.participant_count().await, 0);
}

#[tokio::test]
async fn switch_session_tears_down_and_reconnects_with_next_pair() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    establish_publishing(&client).await;
    client
        .handle_signal(SessionSignal::StreamAdded {
            stream: StreamInfo::new("s1", SurfaceHandle::new()),
        })
        .await;

    client.switch_session().await.unwrap();

    let commands = transport.commands();
    assert!(commands.contains(&Command::Unsubscribe(StreamId::new("s1"))));
    assert_eq!(commands.last(), Some(&Command::Unpublish));

    // Cascading destroy callbacks complete the switch.
    client.handle_signal(SessionSignal::PublishLost).await;
    client.handle_signal(SessionSignal::Disconnected).await;
    assert_eq!(
        transport.connect_requests(),
        vec!["session-0".to_string(), "session-1".to_string()]
    );
}

#[tokio::test]
async fn switch_session_while_connected_disconnects_directly() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    client.connect().await.unwrap();
    client.handle_signal(SessionSignal::Connected).await;

    // Connected but not yet publishing: nothing to unpublish.
    client.switch_session().await.unwrap();
    assert_eq!(transport.last_command(), Some(Command::Disconnect));

    client.handle_signal(SessionSignal::Disconnected).await;
    assert_eq!(
        transport.connect_requests(),
        vec!["session-0".to_string(), "session-1".to_string()]
    );
}

#[tokio::test]
async fn switch_session_while_connecting_is_queued() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    client.connect().await.unwrap();
    client.switch_session().await.unwrap();

    // Nothing torn down yet; the connect attempt is still in flight.
    assert_eq!(transport.connect_requests(), vec!["session-0".to_string()]);
    assert!(!transport.commands().contains(&Command::Disconnect));

    // The attempt resolves: the queued switch abandons the session without
    // publishing, then reconnects with the next pair.
    client.handle_signal(SessionSignal::Connected).await;
    assert_eq!(transport.last_command(), Some(Command::Disconnect));
    assert!(!transport.commands().contains(&Command::Publish));

    client.handle_signal(SessionSignal::Disconnected).await;
    assert_eq!(
        transport.connect_requests(),
        vec!["session-0".to_string(), "session-1".to_string()]
    );
}

#[tokio::test]
async fn queued_switch_survives_a_failed_connect_attempt() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    client.connect().await.unwrap();
    client.switch_session().await.unwrap();

    // The attempt dissolves without ever connecting; the queued switch
    // degenerates into a normal rotated reconnect.
    client
        .handle_signal(SessionSignal::SessionFailed {
            message: "ice failure".to_string(),
        })
        .await;
    client.handle_signal(SessionSignal::Disconnected).await;

    assert_eq!(
        transport.connect_requests(),
        vec!["session-0".to_string(), "session-1".to_string()]
    );
}

#[tokio::test]
async fn switch_session_while_disconnected_connects() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    client.switch_session().await.unwrap();
    assert_eq!(client.current_state().await, SessionState::Connecting);
    assert_eq!(transport.connect_requests(), vec!["session-0".to_string()]);
}

#[tokio::test]
async fn rotation_wraps_across_repeated_switches() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    // Four attempts over a three-entry list wrap back to the first pair.
    client.connect().await.unwrap();
    for _ in 0..3 {
        client.handle_signal(SessionSignal::Connected).await;
        client.switch_session().await.unwrap();
        client.handle_signal(SessionSignal::Disconnected).await;
    }

    assert_eq!(
        transport.connect_requests(),
        vec![
            "session-0".to_string(),
            "session-1".to_string(),
            "session-2".to_string(),
            "session-0".to_string(),
        ]
    );
}

#[tokio::test]
async fn hard_disconnect_cancels_pending_reconnect() {
    let transport = RecordingTransport::new();
    let client = build_client(transport.clone(), Arc::new(MockActivator::new()));

    establish_publishing(&client).await;
    client.switch_session().await.unwrap();

    // The user leaves for good before the cascade completes.
    client.disconnect().await.unwrap();
    client.handle_signal(SessionSignal::Disconnected).await;

    assert_eq!(client.current_state().await, SessionState::Disconnected);
    assert_eq!(transport.connect_requests(), vec!["session-0".to_string()]);
}

#[tokio::test]
async fn audio_guard_can_be_disabled() {
    let transport = RecordingTransport::new();
    let activator = Arc::new(MockActivator::new());
    activator.fail_with(CODE_INSUFFICIENT_PRIORITY, "held by another app");

    let client = RoomClientBuilder::new()
        .api_key("test-key")
        .credential("session-0", "token-0")
        .audio_guard(false)
        .transport(transport.clone())
        .audio_activator(activator)
        .build()
        .unwrap();

    client.connect().await.unwrap();
    client.handle_signal(SessionSignal::Connected).await;

    // With the guard off the contended device is never probed.
    assert_eq!(transport.last_command(), Some(Command::Publish));
    assert_eq!(client.current_state().await, SessionState::Connected);
}
