//! Text sink that routes formatted output onto a lazily provisioned
//! connection.
//!
//! The sink never owns a connection. Every write asks a
//! [`ConnectionProvider`] for the current connection (creating one on demand)
//! and hands the text over as a single frame. Delivery is best-effort: a
//! provider that cannot produce a connection simply causes the write to be
//! dropped.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod connection;
mod sink;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use connection::{Connection, ConnectionProvider};
pub use sink::{ConsoleSink, SinkGuard};
