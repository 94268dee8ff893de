//! Client for the remote worker pool.
//!
//! The worker pool executes muting and deafening on behalf of the bot, so a shard
//! cannot do useful work without it. Construction therefore probes the service once
//! and fails if it cannot be reached. There is no retry loop.

use crate::errors::{Error, Result};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, instrument};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Handle to the worker pool service.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    client: Client,
    base_url: Url,
}

impl WorkerPool {
    /// Builds the client and checks the service answers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerPool`] if the address is not a URL, the HTTP client
    /// cannot be built, or the service does not respond.
    #[instrument]
    pub async fn connect(address: &str) -> Result<Self> {
        let base_url = parse_address(address)?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::WorkerPool {
                address: address.to_string(),
                message: e.to_string(),
            })?;

        let pool = Self { client, base_url };
        pool.probe().await?;
        Ok(pool)
    }

    /// Issues one `GET` against the base URL. Any HTTP response counts as reachable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerPool`] if no response arrives within the timeout.
    pub async fn probe(&self) -> Result<()> {
        let response = self
            .client
            .get(self.base_url.clone())
            .send()
            .await
            .map_err(|e| Error::WorkerPool {
                address: self.base_url.to_string(),
                message: e.to_string(),
            })?;
        debug!(status = %response.status(), "Worker pool responded");
        Ok(())
    }

    /// Base URL every request is issued against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// Parses a worker pool address, assuming `http://` when no scheme is given.
fn parse_address(address: &str) -> Result<Url> {
    let candidate = if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{address}")
    };

    Url::parse(&candidate).map_err(|e| Error::WorkerPool {
        address: address.to_string(),
        message: format!("invalid address: {e}"),
    })
}
