//! Test support utilities
//!
//! In-memory connection provider that records every frame it is handed.
//! Only available in tests or with the `test-support` feature enabled.

use crate::{Connection, ConnectionProvider};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

/// Connection that appends frames to a log shared with its provider.
#[derive(Debug)]
pub struct RecordingConnection {
    id: usize,
    frames: Arc<Mutex<Vec<String>>>,
}

impl RecordingConnection {
    /// Identity of this connection (its open sequence number).
    pub const fn id(&self) -> usize {
        self.id
    }
}

impl Connection for RecordingConnection {
    fn send_text(&self, text: &str) {
        self.frames.lock().push(text.to_owned());
    }
}

/// Provider handing out [`RecordingConnection`]s.
#[derive(Debug, Default)]
pub struct RecordingProvider {
    current: Mutex<Option<Arc<RecordingConnection>>>,
    frames: Arc<Mutex<Vec<String>>>,
    opened: AtomicUsize,
    resets: AtomicUsize,
    unreachable: bool,
}

impl RecordingProvider {
    /// Create a provider that opens connections on demand.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider that never yields a connection.
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Every frame sent so far, across all connections, in send order.
    pub fn frames(&self) -> Vec<String> {
        self.frames.lock().clone()
    }

    /// All frames concatenated.
    pub fn text(&self) -> String {
        self.frames.lock().concat()
    }

    /// Forget recorded frames.
    pub fn clear(&self) {
        self.frames.lock().clear();
    }

    /// The connection currently stored, if any.
    pub fn current(&self) -> Option<Arc<RecordingConnection>> {
        self.current.lock().clone()
    }

    /// Number of connections opened.
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Number of resets that discarded a connection.
    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }
}

impl ConnectionProvider for RecordingProvider {
    type Connection = RecordingConnection;

    fn get_or_open(&self) -> Option<Arc<RecordingConnection>> {
        if self.unreachable {
            return None;
        }

        let mut current = self.current.lock();
        let connection = current.get_or_insert_with(|| {
            Arc::new(RecordingConnection {
                id: self.opened.fetch_add(1, Ordering::SeqCst),
                frames: Arc::clone(&self.frames),
            })
        });

        Some(Arc::clone(connection))
    }

    fn reset(&self) {
        if self.current.lock().take().is_some() {
            self.resets.fetch_add(1, Ordering::SeqCst);
        }
    }
}
