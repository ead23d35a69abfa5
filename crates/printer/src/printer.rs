//! The printer facade

use std::fmt::{Debug, Display};

use printer_sink::{ConnectionProvider, ConsoleSink};
use printer_ws::{Config, ConnectionManager};

/// Separator and terminator used by [`Printer::print`] and
/// [`Printer::debug_print`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintOptions {
    /// Written between items.
    pub separator: String,
    /// Written after the last item.
    pub terminator: String,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            separator: " ".to_string(),
            terminator: "\n".to_string(),
        }
    }
}

impl PrintOptions {
    /// Set the separator.
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Set the terminator.
    #[must_use]
    pub fn terminator(mut self, terminator: impl Into<String>) -> Self {
        self.terminator = terminator.into();
        self
    }
}

/// Options for [`Printer::dump`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpOptions {
    /// Label written before the value.
    pub name: Option<String>,
    /// Number of spaces every line is indented by.
    pub indent: usize,
}

impl DumpOptions {
    /// Set the label.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the indentation.
    #[must_use]
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

/// Prints to a remote console.
///
/// Every operation is best-effort: if no connection can be obtained, or the
/// connection fails, the output is silently lost and the caller carries on.
#[derive(Debug)]
pub struct Printer<P = ConnectionManager> {
    output: ConsoleSink<P>,
}

impl Printer {
    /// Create a printer that connects over WebSocket using `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_provider(ConnectionManager::new(config))
    }

    /// Host used for the next connection.
    pub fn host(&self) -> String {
        self.output.provider().config().host
    }

    /// Set the host used for the next connection.
    pub fn set_host(&self, host: impl Into<String>) {
        self.output.provider().set_host(host);
    }

    /// Port used for the next connection.
    pub fn port(&self) -> u16 {
        self.output.provider().config().port
    }

    /// Set the port used for the next connection.
    pub fn set_port(&self, port: u16) {
        self.output.provider().set_port(port);
    }

    /// Replace the whole endpoint configuration for the next connection.
    pub fn configure(&self, config: Config) {
        self.output.provider().set_config(config);
    }
}

impl<P> Printer<P> {
    /// Create a printer writing through `provider`.
    pub fn with_provider(provider: P) -> Self {
        Self {
            output: ConsoleSink::new(provider),
        }
    }

    /// The underlying sink, for composing output directly.
    pub const fn output(&self) -> &ConsoleSink<P> {
        &self.output
    }
}

impl<P: ConnectionProvider> Printer<P> {
    /// Write the `Display` form of `items`, separated by
    /// `options.separator` and followed by `options.terminator`.
    pub fn print(&self, items: &[&dyn Display], options: &PrintOptions) {
        self.write_items(items, options, |item| item.to_string());
    }

    /// Like [`Printer::print`] but using the `Debug` form of each item.
    pub fn debug_print(&self, items: &[&dyn Debug], options: &PrintOptions) {
        self.write_items(items, options, |item| format!("{item:?}"));
    }

    /// Write the pretty `Debug` rendering of `value` and hand it back.
    ///
    /// The first line is prefixed with `- ` and the optional name, following
    /// lines are aligned under it; every line is indented by
    /// `options.indent` spaces and sent as its own frame.
    pub fn dump<T: Debug>(&self, value: T, options: &DumpOptions) -> T {
        let rendered = format!("{value:#?}");
        let padding = " ".repeat(options.indent);

        let output = self.output.lock();
        for (index, line) in rendered.lines().enumerate() {
            let line = match (index, options.name.as_deref()) {
                (0, Some(name)) => format!("{padding}- {name}: {line}\n"),
                (0, None) => format!("{padding}- {line}\n"),
                _ => format!("{padding}  {line}\n"),
            };
            output.write(&line);
        }

        value
    }

    /// Cancel the current connection so the next write opens a fresh one.
    ///
    /// Does nothing if no connection is open.
    pub fn reset(&self) {
        self.output.reset();
    }

    fn write_items<T: ?Sized>(
        &self,
        items: &[&T],
        options: &PrintOptions,
        decorate: impl Fn(&T) -> String,
    ) {
        let output = self.output.lock();

        let mut prefix = "";
        for item in items {
            output.write(prefix);
            output.write(&decorate(*item));
            prefix = options.separator.as_str();
        }
        output.write(&options.terminator);
    }
}
