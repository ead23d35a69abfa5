use std::sync::Arc;

/// A live text-stream connection.
pub trait Connection: Send + Sync {
    /// Queue `text` as one frame.
    ///
    /// Fire-and-forget: the outcome of the send is never reported back.
    fn send_text(&self, text: &str);
}

/// Source of the current connection.
pub trait ConnectionProvider: Send + Sync {
    /// Connection type handed out by this provider.
    type Connection: Connection;

    /// Return the current connection, opening one if none is stored.
    ///
    /// Returns `None` when no connection can be obtained (for example when the
    /// configured endpoint is malformed).
    fn get_or_open(&self) -> Option<Arc<Self::Connection>>;

    /// Cancel and forget the current connection if it is still running.
    fn reset(&self);
}

impl<P: ConnectionProvider + ?Sized> ConnectionProvider for Arc<P> {
    type Connection = P::Connection;

    fn get_or_open(&self) -> Option<Arc<Self::Connection>> {
        (**self).get_or_open()
    }

    fn reset(&self) {
        (**self).reset();
    }
}

impl<P: ConnectionProvider + ?Sized> ConnectionProvider for &P {
    type Connection = P::Connection;

    fn get_or_open(&self) -> Option<Arc<Self::Connection>> {
        (**self).get_or_open()
    }

    fn reset(&self) {
        (**self).reset();
    }
}
