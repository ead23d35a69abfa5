//! Integration tests for the console listener

use futures::{SinkExt, StreamExt};
use printer_listener::{ConsoleEvent, ConsoleListener, Error, ListenerConfig};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Message, Utf8Bytes};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

fn ephemeral_config() -> ListenerConfig {
    ListenerConfig {
        addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        ..ListenerConfig::default()
    }
}

async fn next_event(events: &mut broadcast::Receiver<ConsoleEvent>) -> ConsoleEvent {
    timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("Event timeout")
        .expect("Event channel closed")
}

#[tokio::test]
async fn test_text_frames_are_published() {
    let _ = tracing_subscriber::fmt::try_init();

    let listener = ConsoleListener::new(ephemeral_config());
    let mut events = listener.subscribe();
    let addr = listener.start().await.expect("Failed to start listener");

    let (mut client, _) = connect_async(format!("ws://{addr}/console"))
        .await
        .expect("Failed to connect");

    let ConsoleEvent::Connected { connection } = next_event(&mut events).await else {
        panic!("expected a connect event");
    };

    for text in ["Hello", "", "World\n"] {
        client
            .send(Message::text(text))
            .await
            .expect("Failed to send");
    }

    for expected in ["Hello", "", "World\n"] {
        assert_eq!(
            next_event(&mut events).await,
            ConsoleEvent::Text {
                connection,
                text: expected.to_string(),
            }
        );
    }

    client
        .close(Some(CloseFrame {
            code: CloseCode::Away,
            reason: Utf8Bytes::from_static(""),
        }))
        .await
        .expect("Failed to close");

    assert_eq!(
        next_event(&mut events).await,
        ConsoleEvent::Closed {
            connection,
            code: Some(1001),
        }
    );

    listener.shutdown().await;
}

#[tokio::test]
async fn test_other_paths_are_rejected() {
    let listener = ConsoleListener::new(ephemeral_config());
    let addr = listener.start().await.expect("Failed to start listener");

    let result = connect_async(format!("ws://{addr}/elsewhere")).await;
    assert!(result.is_err());

    listener.shutdown().await;
}

#[tokio::test]
async fn test_start_twice_fails() {
    let listener = ConsoleListener::new(ephemeral_config());
    listener.start().await.expect("Failed to start listener");

    assert!(matches!(listener.start().await, Err(Error::AlreadyStarted)));

    listener.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_ends_open_sessions() {
    let listener = ConsoleListener::new(ephemeral_config());
    let mut events = listener.subscribe();
    let addr = listener.start().await.expect("Failed to start listener");

    let (mut client, _) = connect_async(format!("ws://{addr}/console"))
        .await
        .expect("Failed to connect");
    let ConsoleEvent::Connected { connection } = next_event(&mut events).await else {
        panic!("expected a connect event");
    };

    timeout(Duration::from_secs(5), listener.shutdown())
        .await
        .expect("Shutdown timeout");

    assert_eq!(
        next_event(&mut events).await,
        ConsoleEvent::Closed {
            connection,
            code: None,
        }
    );

    // The server side is gone; the client sees the stream end.
    let next = timeout(Duration::from_secs(5), client.next())
        .await
        .expect("Client timeout");
    assert!(!matches!(next, Some(Ok(Message::Text(_)))));
}

#[tokio::test]
async fn test_echo_still_publishes_events() {
    let listener = ConsoleListener::new(ListenerConfig {
        echo: true,
        ..ephemeral_config()
    });
    let mut events = listener.subscribe();
    let addr = listener.start().await.expect("Failed to start listener");

    let (mut client, _) = connect_async(format!("ws://{addr}/console"))
        .await
        .expect("Failed to connect");
    let ConsoleEvent::Connected { connection } = next_event(&mut events).await else {
        panic!("expected a connect event");
    };

    client
        .send(Message::text("echoed\n"))
        .await
        .expect("Failed to send");

    assert_eq!(
        next_event(&mut events).await,
        ConsoleEvent::Text {
            connection,
            text: "echoed\n".to_string(),
        }
    );

    listener.shutdown().await;
}
