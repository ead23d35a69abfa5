use thiserror::Error;

/// Result type used by the WebSocket provider.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while provisioning a console connection.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured host, port or path does not form a valid endpoint URL.
    #[error("invalid console endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// IO operation failed.
    #[error("{0}: {1}")]
    Io(&'static str, #[source] std::io::Error),
}
