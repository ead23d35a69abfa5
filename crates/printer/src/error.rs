use thiserror::Error;

/// Result type used by the printer.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while wiring the printer into the host process.
#[derive(Debug, Error)]
pub enum Error {
    /// Could not set global default subscriber.
    #[error("could not set global default subscriber: {0}")]
    SetTracing(#[from] tracing::dispatcher::SetGlobalDefaultError),
}
