//! Route `tracing` output to the remote console.

use crate::error::Result;

use printer_sink::{ConnectionProvider, ConsoleSink, SinkGuard};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::{Layer, layer::SubscriberExt};

/// Targets whose events are never forwarded: they describe the console
/// connection itself and would otherwise feed back into it.
const SILENCED_TARGETS: [&str; 2] = ["printer_sink", "printer_ws"];

/// [`MakeWriter`] that writes each formatted event into a [`ConsoleSink`].
///
/// Every event is written while holding the sink lock, so events never
/// interleave with a concurrent print.
#[derive(Debug)]
pub struct ConsoleMakeWriter<'s, P> {
    sink: &'s ConsoleSink<P>,
}

impl<'s, P> ConsoleMakeWriter<'s, P> {
    /// Create a writer factory for `sink`.
    pub const fn new(sink: &'s ConsoleSink<P>) -> Self {
        Self { sink }
    }
}

impl<'a, 's, P: ConnectionProvider> MakeWriter<'a> for ConsoleMakeWriter<'s, P> {
    type Writer = SinkGuard<'s, P>;

    fn make_writer(&'a self) -> Self::Writer {
        self.sink.lock()
    }
}

/// Filter dropping events that must not reach the console.
#[must_use]
pub fn console_filter(level: LevelFilter) -> Targets {
    SILENCED_TARGETS
        .iter()
        .fold(Targets::new().with_default(level), |targets, target| {
            targets.with_target(*target, LevelFilter::OFF)
        })
}

/// Sets up a tracing subscriber that logs `INFO` and above to stdout and to
/// the process-wide remote console.
///
/// # Errors
///
/// This function will return an error if a global default subscriber is
/// already set.
pub fn configure_logging_to_console() -> Result<()> {
    let writer_layer = fmt::Layer::new()
        .with_ansi(false)
        .with_writer(ConsoleMakeWriter::new(crate::output()))
        .with_filter(console_filter(LevelFilter::INFO));

    let subscriber = tracing_subscriber::registry()
        .with(LevelFilter::INFO)
        .with(fmt::Layer::default())
        .with(writer_layer);

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use printer_sink::test_support::RecordingProvider;
    use tracing::{info, warn};
    use tracing_subscriber::Registry;

    #[test]
    fn test_events_are_written_to_sink() {
        let sink: &'static ConsoleSink<RecordingProvider> =
            Box::leak(Box::new(ConsoleSink::new(RecordingProvider::new())));
        let subscriber = Registry::default().with(
            fmt::Layer::new()
                .with_ansi(false)
                .without_time()
                .with_target(false)
                .with_writer(ConsoleMakeWriter::new(sink))
                .with_filter(console_filter(LevelFilter::INFO)),
        );

        tracing::subscriber::with_default(subscriber, || {
            info!("hello console");
            tracing::debug!("too verbose");
            warn!(target: "printer_ws", "about the connection itself");
        });

        let frames = sink.provider().frames();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].contains("INFO"));
        assert!(frames[0].ends_with("hello console\n"));
    }
}
