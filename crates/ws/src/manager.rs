use crate::config::Config;
use crate::connection::ConsoleConnection;
use crate::error::{Error, Result};

use std::fmt::{self, Debug};
use std::sync::{Arc, OnceLock};

use parking_lot::{Mutex, RwLock};
use printer_sink::ConnectionProvider;
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::debug;

/// Owns the single console connection and the configuration used to open it.
///
/// The connection is opened lazily by [`ConnectionProvider::get_or_open`] and
/// only discarded by [`ConnectionProvider::reset`]. A connection that failed
/// or was closed by the remote side stays in place until reset.
///
/// Connections are driven on a single-worker runtime owned by the manager and
/// created on first use, so they outlive whatever runtime the caller is on.
pub struct ConnectionManager {
    config: RwLock<Config>,
    current: Mutex<Option<Arc<ConsoleConnection>>>,
    runtime: OnceLock<Runtime>,
}

impl ConnectionManager {
    /// Create a manager that will connect using `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            current: Mutex::new(None),
            runtime: OnceLock::new(),
        }
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    /// Replace the configuration used for the next connection.
    pub fn set_config(&self, config: Config) {
        *self.config.write() = config;
    }

    /// Set the host used for the next connection.
    pub fn set_host(&self, host: impl Into<String>) {
        self.config.write().host = host.into();
    }

    /// Set the port used for the next connection.
    pub fn set_port(&self, port: u16) {
        self.config.write().port = port;
    }

    /// The stored connection, without opening one.
    pub fn current(&self) -> Option<Arc<ConsoleConnection>> {
        self.current.lock().clone()
    }

    fn open(&self) -> Result<Arc<ConsoleConnection>> {
        let url = self.config.read().endpoint_url()?;
        let runtime = self.runtime_handle()?;

        Ok(Arc::new(ConsoleConnection::spawn(url, &runtime)))
    }

    fn runtime_handle(&self) -> Result<Handle> {
        if let Some(runtime) = self.runtime.get() {
            return Ok(runtime.handle().clone());
        }

        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("printer-io")
            .enable_all()
            .build()
            .map_err(|e| Error::Io("failed to build console runtime", e))?;

        Ok(self.runtime.get_or_init(|| runtime).handle().clone())
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl ConnectionProvider for ConnectionManager {
    type Connection = ConsoleConnection;

    fn get_or_open(&self) -> Option<Arc<ConsoleConnection>> {
        let error = {
            let mut current = self.current.lock();
            if let Some(connection) = current.as_ref() {
                return Some(Arc::clone(connection));
            }

            match self.open() {
                Ok(connection) => {
                    *current = Some(Arc::clone(&connection));
                    return Some(connection);
                }
                Err(e) => e,
            }
        };

        // Logged after the lock is released so a subscriber writing back into
        // the console cannot deadlock on it.
        debug!("unable to open console connection: {}", error);

        None
    }

    fn reset(&self) {
        let mut current = self.current.lock();

        let Some(connection) = current.as_ref() else {
            return;
        };

        if !connection.is_running() {
            return;
        }

        connection.cancel();
        *current = None;
    }
}

impl Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("config", &*self.config.read())
            .field("current", &*self.current.lock())
            .field("owns_runtime", &self.runtime.get().is_some())
            .finish()
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        if let Some(connection) = self.current.get_mut().take() {
            connection.cancel();
        }

        // Safe to call from within another runtime, unlike dropping it.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
