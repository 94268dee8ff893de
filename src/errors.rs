//! Unified error types for the shard process.
//!
//! Every failure the orchestrator can observe maps to one variant here. Whether a
//! variant is fatal is decided by the caller: configuration, worker pool, schema and
//! shard failures abort the process, cache and database failures degrade it, and
//! registration failures are logged per command.

use crate::config::ConfigError;
use crate::models::Scope;
use thiserror::Error;

/// Errors raised while bootstrapping, running or tearing down a shard.
#[derive(Debug, Error)]
pub enum Error {
    /// The environment did not describe a runnable process.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The cache store could not be reached.
    #[error("Cache error ({operation}): {message}")]
    Cache {
        /// What was being attempted
        operation: &'static str,
        /// Underlying client error
        message: String,
    },

    /// The relational store could not be reached or queried.
    #[error("Database error ({operation}): {source}")]
    Database {
        /// What was being attempted
        operation: &'static str,
        /// Underlying driver error
        #[source]
        source: sea_orm::DbErr,
    },

    /// The worker-pool client could not be constructed.
    #[error("Worker pool error at {address}: {message}")]
    WorkerPool {
        /// Address the client was built for
        address: String,
        /// Reason construction failed
        message: String,
    },

    /// The bundled schema script failed to apply.
    #[error("Schema bootstrap from {path} failed: {message}")]
    SchemaBootstrap {
        /// Script location
        path: String,
        /// Reason the script failed
        message: String,
    },

    /// The gateway session for this shard could not be established.
    #[error("Shard runtime error: {0}")]
    Shard(String),

    /// A command could not be created in a scope.
    #[error("Failed to register command `{command}` in {scope}: {message}")]
    Registration {
        /// Command name
        command: String,
        /// Target scope
        scope: Scope,
        /// Platform error
        message: String,
    },

    /// A previously registered command could not be deleted.
    #[error("Failed to delete command `{command}` in {scope}: {message}")]
    Deregistration {
        /// Command name
        command: String,
        /// Scope the command lives in
        scope: Scope,
        /// Platform error
        message: String,
    },

    /// The log sink could not be installed.
    #[error("Logging setup error: {0}")]
    Logging(String),

    /// I/O failure (log file, schema script).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error surfaced by the command framework while handling an interaction.
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
