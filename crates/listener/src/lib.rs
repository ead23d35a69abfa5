//! Remote console listener.
//!
//! Serves WebSocket upgrades on `/console` and publishes every text frame it
//! receives as a [`ConsoleEvent`], optionally echoing the text to stdout. This
//! is the receiving end of the printer's connection.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::{Error, Result};

use std::net::SocketAddr;

use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use axum::routing::get;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Something that happened on the console endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// A client completed the WebSocket handshake.
    Connected {
        /// Identity assigned to the client connection.
        connection: Uuid,
    },
    /// A text frame arrived.
    Text {
        /// Connection the frame arrived on.
        connection: Uuid,
        /// Frame payload.
        text: String,
    },
    /// The connection ended.
    Closed {
        /// Connection that ended.
        connection: Uuid,
        /// Close code sent by the client, if it sent a close frame.
        code: Option<u16>,
    },
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Address to bind. Port `0` picks a free port.
    pub addr: SocketAddr,
    /// Route serving the WebSocket upgrade.
    pub path: String,
    /// Write received text to stdout.
    pub echo: bool,
    /// Capacity of the event channel.
    pub channel_capacity: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 7529)),
            path: "/console".to_string(),
            echo: false,
            channel_capacity: 1024,
        }
    }
}

/// Console endpoint service.
#[derive(Debug)]
pub struct ConsoleListener {
    config: ListenerConfig,
    events: broadcast::Sender<ConsoleEvent>,
    shutdown_token: CancellationToken,
    task_tracker: TaskTracker,
}

#[derive(Clone)]
struct SessionState {
    events: broadcast::Sender<ConsoleEvent>,
    shutdown_token: CancellationToken,
    task_tracker: TaskTracker,
    echo: bool,
}

impl ConsoleListener {
    /// Create a new `ConsoleListener`.
    #[must_use]
    pub fn new(config: ListenerConfig) -> Self {
        let (events, _) = broadcast::channel(config.channel_capacity);

        Self {
            config,
            events,
            shutdown_token: CancellationToken::new(),
            task_tracker: TaskTracker::new(),
        }
    }

    /// Receive events from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleEvent> {
        self.events.subscribe()
    }

    /// Bind and start serving.
    ///
    /// Returns the bound address, which differs from the configured one when
    /// port `0` was requested.
    ///
    /// # Errors
    ///
    /// This function will return an error if the listener is already started
    /// or the address cannot be bound.
    pub async fn start(&self) -> Result<SocketAddr> {
        if self.task_tracker.is_closed() {
            return Err(Error::AlreadyStarted);
        }

        let listener = TcpListener::bind(self.config.addr)
            .await
            .map_err(|e| Error::Io("failed to bind console listener", e))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| Error::Io("failed to read console listener address", e))?;

        let state = SessionState {
            events: self.events.clone(),
            shutdown_token: self.shutdown_token.clone(),
            task_tracker: self.task_tracker.clone(),
            echo: self.config.echo,
        };

        let router = Router::new()
            .route(&self.config.path, get(upgrade))
            .with_state(state);

        let shutdown_token = self.shutdown_token.clone();
        self.task_tracker.spawn(async move {
            let shutdown = async move { shutdown_token.cancelled().await };

            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!("console listener failed: {}", e);
            }
        });

        self.task_tracker.close();

        info!("console listener on {}{}", local_addr, self.config.path);

        Ok(local_addr)
    }

    /// Shutdown the listener and wait for open sessions to end.
    pub async fn shutdown(&self) {
        info!("console listener shutting down...");

        self.shutdown_token.cancel();
        self.task_tracker.wait().await;

        info!("console listener shutdown complete.");
    }
}

async fn upgrade(ws: WebSocketUpgrade, State(state): State<SessionState>) -> Response {
    let task_tracker = state.task_tracker.clone();

    ws.on_upgrade(move |socket| task_tracker.track_future(session(socket, state)))
}

async fn session(mut socket: WebSocket, state: SessionState) {
    let connection = Uuid::new_v4();
    debug!("console client {} connected", connection);

    let _ = state.events.send(ConsoleEvent::Connected { connection });

    let mut stdout = tokio::io::stdout();

    let code = loop {
        let message = tokio::select! {
            () = state.shutdown_token.cancelled() => break None,
            message = socket.recv() => message,
        };

        match message {
            Some(Ok(Message::Text(text))) => {
                if state.echo {
                    let _ = stdout.write_all(text.as_str().as_bytes()).await;
                    let _ = stdout.flush().await;
                }

                let _ = state.events.send(ConsoleEvent::Text {
                    connection,
                    text: text.as_str().to_owned(),
                });
            }
            Some(Ok(Message::Close(frame))) => break frame.map(|frame| frame.code),
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                debug!("console client {} errored: {}", connection, e);
                break None;
            }
            None => break None,
        }
    };

    debug!("console client {} disconnected ({:?})", connection, code);

    let _ = state.events.send(ConsoleEvent::Closed { connection, code });
}
