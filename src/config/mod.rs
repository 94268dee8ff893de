//! Process configuration resolved from the environment.

/// Cache store connection parameters
pub mod cache;

/// Relational store connection parameters
pub mod database;

/// Locale catalog settings and loading
pub mod locale;

/// Log sink settings and subscriber installation
pub mod logging;

/// Top-level runtime configuration and its resolver
pub mod runtime;

use thiserror::Error;

pub use cache::CacheParams;
pub use database::DatabaseParams;
pub use locale::{LocaleCatalog, LocaleSettings};
pub use logging::{LogSink, LoggingSettings};
pub use runtime::RuntimeConfig;

/// Reasons the environment cannot produce a [`RuntimeConfig`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required environment variable is not set.
    ///
    /// Check the `.env.example` file for the full list of required variables.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// `SHARD_ID` names a shard outside `0..NUM_SHARDS`.
    #[error(
        "SHARD_ID {shard_index} is higher than or equal to the total number of shards ({num_shards})"
    )]
    ShardOutOfRange {
        /// Requested shard index
        shard_index: u32,
        /// Total shard count in effect
        num_shards: u32,
    },

    /// An entry of `SLASH_COMMAND_GUILD_IDS` is not a guild id.
    #[error("Invalid guild id `{0}` in SLASH_COMMAND_GUILD_IDS")]
    InvalidGuildId(String),

    /// `WORKER_BOT_TOKENS` belongs to the worker pool service now.
    #[error("WORKER_BOT_TOKENS is now a variable used by the worker pool service, not this bot")]
    RelocatedWorkerTokens,
}

/// Reads `key` through `lookup`, treating an empty value as unset.
pub(crate) fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.is_empty())
}
