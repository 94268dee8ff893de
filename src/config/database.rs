//! Relational store connection parameters.
//!
//! The store is Postgres. The database name follows the user name, matching the
//! default layout of the official container image.

/// How to reach the relational store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseParams {
    /// `host:port` of the server (`POSTGRES_ADDR`)
    pub address: String,
    /// Login role (`POSTGRES_USER`)
    pub user: String,
    /// Login password (`POSTGRES_PASS`)
    pub password: String,
}

impl DatabaseParams {
    /// Builds the `postgres://` connection URL.
    ///
    /// User and password are percent-encoded so reserved characters survive.
    #[must_use]
    pub fn url(&self) -> String {
        let user = urlencoding::encode(&self.user);
        format!(
            "postgres://{user}:{}@{}/{user}",
            urlencoding::encode(&self.password),
            self.address
        )
    }
}
