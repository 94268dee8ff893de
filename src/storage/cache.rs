//! Redis cache client.

use crate::config::CacheParams;
use crate::errors::{Error, Result};
use redis::Client;
use redis::aio::ConnectionManager;
use tracing::{debug, instrument};

/// Shared handle to the cache store.
///
/// Cloning is cheap; all clones multiplex over one managed connection.
#[derive(Clone)]
pub struct Cache {
    conn_manager: ConnectionManager,
}

impl Cache {
    /// Connects to the cache store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cache`] if the URL is invalid or the server is unreachable.
    #[instrument(skip(params), fields(address = %params.address))]
    pub async fn connect(params: &CacheParams) -> Result<Self> {
        let client = params
            .connection_info()
            .and_then(Client::open)
            .map_err(|e| Error::Cache {
                operation: "open client",
                message: e.to_string(),
            })?;

        let conn_manager = ConnectionManager::new(client)
            .await
            .map_err(|e| Error::Cache {
                operation: "connect",
                message: e.to_string(),
            })?;

        debug!("Cache connection established");
        Ok(Self { conn_manager })
    }

    /// Round-trips a `PING` to the server.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cache`] if the server does not answer.
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.conn_manager.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| Error::Cache {
                operation: "ping",
                message: e.to_string(),
            })?;
        Ok(())
    }
}
