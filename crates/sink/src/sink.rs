use crate::{Connection, ConnectionProvider};

use std::fmt::{self, Debug};
use std::io;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use tracing::trace;

/// Routes text onto whatever connection the provider currently considers
/// current.
///
/// Each call to [`ConsoleSink::write`] is transmitted immediately as its own
/// frame. Callers composing one logical message out of several writes should
/// hold a [`SinkGuard`] (see [`ConsoleSink::lock`]) for the whole sequence so
/// that frames from concurrent callers are not interleaved.
pub struct ConsoleSink<P> {
    provider: P,
    lock: ReentrantMutex<()>,
}

impl<P> ConsoleSink<P> {
    /// Create a sink backed by `provider`.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            lock: ReentrantMutex::new(()),
        }
    }

    /// The provider this sink obtains connections from.
    pub const fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: ConnectionProvider> ConsoleSink<P> {
    /// Send `text` as one frame on the current connection, opening a
    /// connection first if needed.
    ///
    /// Silently drops the text when the provider yields no connection.
    pub fn write(&self, text: &str) {
        let Some(connection) = self.provider.get_or_open() else {
            trace!("no console connection, dropping {} bytes", text.len());
            return;
        };

        connection.send_text(text);
    }

    /// Acquire the sink for a multi-write sequence.
    ///
    /// The lock is reentrant: a thread already holding a guard may lock again
    /// (for instance by calling a print helper) without deadlocking. It is
    /// released when the returned guard is dropped.
    pub fn lock(&self) -> SinkGuard<'_, P> {
        SinkGuard {
            sink: self,
            _guard: self.lock.lock(),
        }
    }

    /// Cancel the provider's current connection.
    ///
    /// Takes the sink lock first so a reset never lands in the middle of
    /// another caller's multi-write sequence.
    pub fn reset(&self) {
        let _guard = self.lock.lock();
        self.provider.reset();
    }
}

impl<P> Debug for ConsoleSink<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("locked", &self.lock.is_locked())
            .finish_non_exhaustive()
    }
}

/// Exclusive access to a [`ConsoleSink`] for the lifetime of the guard.
///
/// Implements [`fmt::Write`] and [`io::Write`] so formatting machinery can
/// target the sink directly. Every `write_str`/`write` call becomes one frame.
#[must_use = "the sink is unlocked as soon as the guard is dropped"]
pub struct SinkGuard<'a, P> {
    sink: &'a ConsoleSink<P>,
    _guard: ReentrantMutexGuard<'a, ()>,
}

impl<P: ConnectionProvider> SinkGuard<'_, P> {
    /// Send `text` as one frame while holding the lock.
    pub fn write(&self, text: &str) {
        self.sink.write(text);
    }
}

impl<P> Debug for SinkGuard<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkGuard").finish_non_exhaustive()
    }
}

impl<P: ConnectionProvider> fmt::Write for SinkGuard<'_, P> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.sink.write(s);
        Ok(())
    }
}

impl<P: ConnectionProvider> io::Write for SinkGuard<'_, P> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sink.write(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
