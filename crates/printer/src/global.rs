//! The process-wide printer.
//!
//! Configured with the defaults (`localhost:7529`) until [`set_host`],
//! [`set_port`] or [`configure`] say otherwise. Settings are read when a
//! connection is opened, so changes made while connected apply after the next
//! [`reset`].

use crate::printer::{DumpOptions, PrintOptions, Printer};

use std::fmt::{Debug, Display};
use std::sync::LazyLock;

use printer_sink::ConsoleSink;
use printer_ws::{Config, ConnectionManager};

static PRINTER: LazyLock<Printer> = LazyLock::new(|| Printer::new(Config::default()));

/// The process-wide printer.
pub fn global() -> &'static Printer {
    &PRINTER
}

/// The process-wide sink, for writing to the console directly.
///
/// Hold the guard returned by [`ConsoleSink::lock`] while composing a message
/// out of several writes.
pub fn output() -> &'static ConsoleSink<ConnectionManager> {
    PRINTER.output()
}

/// Host used for the next connection.
pub fn host() -> String {
    PRINTER.host()
}

/// Set the host used for the next connection.
pub fn set_host(host: impl Into<String>) {
    PRINTER.set_host(host);
}

/// Port used for the next connection.
pub fn port() -> u16 {
    PRINTER.port()
}

/// Set the port used for the next connection.
pub fn set_port(port: u16) {
    PRINTER.set_port(port);
}

/// Replace the endpoint configuration used for the next connection.
pub fn configure(config: Config) {
    PRINTER.configure(config);
}

/// See [`Printer::print`].
pub fn print(items: &[&dyn Display], options: &PrintOptions) {
    PRINTER.print(items, options);
}

/// See [`Printer::debug_print`].
pub fn debug_print(items: &[&dyn Debug], options: &PrintOptions) {
    PRINTER.debug_print(items, options);
}

/// See [`Printer::dump`].
pub fn dump<T: Debug>(value: T, options: &DumpOptions) -> T {
    PRINTER.dump(value, options)
}

/// Close the current connection, if open, so the next write reconnects.
pub fn reset() {
    PRINTER.reset();
}
