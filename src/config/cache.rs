//! Cache store connection parameters.

use redis::{ConnectionInfo, IntoConnectionInfo, RedisResult};

/// How to reach the cache store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheParams {
    /// `host:port`, or a full `redis://` / `rediss://` URL
    pub address: String,
    /// Optional password (`REDIS_PASS`)
    pub password: Option<String>,
}

impl CacheParams {
    /// Builds the client connection parameters.
    ///
    /// The password is handed to the client as its own field, never spliced into
    /// the URL, and replaces any password embedded in a full URL address.
    ///
    /// # Errors
    ///
    /// Returns the client's parse error if the address is not a valid host or URL.
    pub fn connection_info(&self) -> RedisResult<ConnectionInfo> {
        let mut info = if self.address.contains("://") {
            self.address.as_str().into_connection_info()?
        } else {
            format!("redis://{}", self.address).into_connection_info()?
        };
        if let Some(password) = &self.password {
            info.redis.password = Some(password.clone());
        }
        Ok(info)
    }
}
