//! Bot layer - Discord-specific runtime, commands and collaborator wiring
//!
//! This module hosts the shard's gateway session, the slash-command catalog and
//! the production implementations of the lifecycle collaborator traits.

/// Production collaborator factory
pub mod backends;
/// Slash-command catalog
pub mod commands;
/// Gateway session for one shard
pub mod shard;

use crate::config::{LocaleCatalog, RuntimeConfig};
use crate::errors::Error;
use crate::lifecycle::BuildInfo;
use crate::storage::{Cache, Postgres, WorkerPool};
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub use backends::DiscordBackends;
pub use shard::DiscordShard;

/// Shared data available to all bot commands.
///
/// Built once from the initialized dependencies when the shard starts. Degraded
/// dependencies are `None`.
pub struct BotData {
    /// Resolved process configuration
    pub config: Arc<RuntimeConfig>,
    /// Cache store, if it connected
    pub cache: Option<Cache>,
    /// Relational store, if it connected
    pub database: Option<Postgres>,
    /// Worker pool client
    pub worker_pool: WorkerPool,
    /// Message catalog for the configured language
    pub locale: Arc<LocaleCatalog>,
    /// Binary version information
    pub build: BuildInfo,
    /// When the shard came up
    pub started_at: DateTime<Utc>,
}

/// Poise context carrying [`BotData`].
pub type Context<'a> = poise::Context<'a, BotData, Error>;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            tracing::error!("Failed to set up shard session: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                tracing::error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}
