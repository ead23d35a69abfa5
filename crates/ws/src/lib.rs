//! WebSocket connection provider for the remote console.
//!
//! [`ConnectionManager`] keeps at most one [`ConsoleConnection`] open to
//! `ws://{host}:{port}/console`, creating it on first use and cancelling it
//! only when explicitly reset. Frames are queued to a background task and
//! sent in order; send failures are never reported to the caller.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod connection;
mod error;
mod manager;

pub use config::{CONSOLE_PATH, Config, ConfigBuilder, DEFAULT_HOST, DEFAULT_PORT};
pub use connection::{ConnectionState, ConsoleConnection};
pub use error::{Error, Result};
pub use manager::ConnectionManager;

// Re-export so callers can implement against the same traits.
pub use printer_sink::{Connection, ConnectionProvider};
pub use url::Url;
