use crate::error::{Error, Result};

use url::Url;

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = "localhost";

/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 7529;

/// Resource path of the console endpoint.
pub const CONSOLE_PATH: &str = "/console";

const SCHEME: &str = "ws";

/// Endpoint configuration.
///
/// Only read when a new connection is created: changing it does not affect a
/// connection that is already open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host to connect to.
    pub host: String,
    /// Port to connect to.
    pub port: u16,
    /// Resource path on the remote side.
    pub path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            path: CONSOLE_PATH.to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Build the `ws://host:port/path` URL for this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is empty or not a valid host name or IP
    /// address.
    pub fn endpoint_url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("{SCHEME}://{DEFAULT_HOST}"))?;

        url.set_host(Some(&self.host))?;
        url.set_port(Some(self.port))
            .map_err(|()| Error::InvalidEndpoint(url::ParseError::InvalidPort))?;
        url.set_path(&self.path);

        Ok(url)
    }
}

/// Builder for [`Config`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder starting from the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the port.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    /// Set the resource path.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.config.path = path.into();
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }
}
