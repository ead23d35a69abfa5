use std::fmt::{self, Debug};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use futures::SinkExt;
use printer_sink::Connection;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::{Message, Utf8Bytes};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use url::Url;
use uuid::Uuid;

/// Lifecycle of a [`ConsoleConnection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Handshake in progress; frames are queued until it completes.
    Connecting,
    /// Handshake completed; frames are being sent.
    Open,
    /// Cancelled, failed or closed by the remote side.
    Closed,
}

impl ConnectionState {
    const fn as_u8(self) -> u8 {
        match self {
            Self::Connecting => 0,
            Self::Open => 1,
            Self::Closed => 2,
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Connecting,
            1 => Self::Open,
            _ => Self::Closed,
        }
    }
}

/// Shared, atomically updated connection state.
#[derive(Debug)]
struct SharedState(AtomicU8);

impl SharedState {
    const fn new(state: ConnectionState) -> Self {
        Self(AtomicU8::new(state.as_u8()))
    }

    fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.0.load(Ordering::Acquire))
    }

    fn set(&self, state: ConnectionState) {
        self.0.store(state.as_u8(), Ordering::Release);
    }

    /// Move from `Connecting` to `Open` unless something closed us first.
    fn mark_open(&self) -> bool {
        self.0
            .compare_exchange(
                ConnectionState::Connecting.as_u8(),
                ConnectionState::Open.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

/// One WebSocket connection to the console endpoint.
///
/// Frames handed to [`Connection::send_text`] are queued to a background task
/// which performs the handshake and then sends them in order. The handle never
/// reconnects: once closed it stays closed until the owner replaces it.
pub struct ConsoleConnection {
    id: Uuid,
    url: Url,
    state: Arc<SharedState>,
    frames: mpsc::UnboundedSender<String>,
    shutdown_token: CancellationToken,
}

impl ConsoleConnection {
    /// Start connecting to `url` on `runtime`.
    pub(crate) fn spawn(url: Url, runtime: &Handle) -> Self {
        let id = Uuid::new_v4();
        let (frames, receiver) = mpsc::unbounded_channel();
        let state = Arc::new(SharedState::new(ConnectionState::Connecting));
        let shutdown_token = CancellationToken::new();

        runtime.spawn(run(
            id,
            url.clone(),
            receiver,
            Arc::clone(&state),
            shutdown_token.clone(),
        ));

        Self {
            id,
            url,
            state,
            frames,
            shutdown_token,
        }
    }

    /// Identity of this connection.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Endpoint this connection targets.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    /// Whether the connection is connecting or open.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() != ConnectionState::Closed
    }

    /// Request a graceful "going away" close.
    ///
    /// Frames already queued are still sent before the close frame; nothing
    /// waits for the close to complete.
    pub fn cancel(&self) {
        self.state.set(ConnectionState::Closed);
        self.shutdown_token.cancel();
    }
}

impl Connection for ConsoleConnection {
    fn send_text(&self, text: &str) {
        // A closed receiver means the task is gone; the frame is dropped.
        let _ = self.frames.send(text.to_owned());
    }
}

impl Debug for ConsoleConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleConnection")
            .field("id", &self.id)
            .field("url", &self.url.as_str())
            .field("state", &self.state())
            .finish()
    }
}

// Nothing in here may log per frame: with the tracing bridge installed every
// event becomes another frame on this very connection.
async fn run(
    id: Uuid,
    url: Url,
    mut frames: mpsc::UnboundedReceiver<String>,
    state: Arc<SharedState>,
    shutdown_token: CancellationToken,
) {
    let task_state = Arc::clone(&state);
    scopeguard::defer! {
        task_state.set(ConnectionState::Closed);
    }

    let connected = tokio::select! {
        () = shutdown_token.cancelled() => return,
        result = connect_async(url.as_str()) => result,
    };

    let mut ws_stream = match connected {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => {
            debug!("console connection {} to {} failed: {}", id, url, e);
            return;
        }
    };

    if state.mark_open() {
        debug!("console connection {} open", id);
    }

    loop {
        tokio::select! {
            biased;

            frame = frames.recv() => {
                let Some(text) = frame else {
                    let close = shutdown_token.is_cancelled().then(going_away);
                    let _ = ws_stream.close(close).await;
                    break;
                };

                if ws_stream.send(Message::text(text)).await.is_err() {
                    break;
                }
            }
            () = shutdown_token.cancelled() => {
                let _ = ws_stream.close(Some(going_away())).await;
                break;
            }
        }
    }

    debug!("console connection {} closed", id);
}

fn going_away() -> CloseFrame {
    CloseFrame {
        code: CloseCode::Away,
        reason: Utf8Bytes::from_static(""),
    }
}
