//! Print to a remote console over WebSocket.
//!
//! Output goes to `ws://localhost:7529/console` unless configured otherwise.
//! The connection is opened on first use and kept until [`reset`]. Printing
//! never blocks on the network and never fails: if the console cannot be
//! reached, output is silently dropped.
//!
//! ```no_run
//! use printer::{console_dump, console_print};
//!
//! printer::set_port(9000);
//! console_print!("Hello", "World");
//! let point = console_dump!((1, 2); name = "point");
//! printer::reset();
//! ```
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;
mod global;
mod macros;
mod printer;

pub mod logging;

pub use error::{Error, Result};
pub use global::{
    configure, debug_print, dump, global, host, output, port, print, reset, set_host, set_port,
};
pub use printer::{DumpOptions, PrintOptions, Printer};

pub use printer_sink::{Connection, ConnectionProvider, ConsoleSink, SinkGuard};
pub use printer_ws::{Config, ConfigBuilder, ConnectionManager, DEFAULT_HOST, DEFAULT_PORT};
