//! Capabilities the orchestrator needs from the shard runtime.

use crate::errors::Result;
use crate::models::{CommandDefinition, RegisteredCommand, Scope};
use poise::serenity_prelude::{ApplicationId, UserId};
use std::future::Future;

/// Remote slash-command operations.
pub trait CommandRemote: Send + Sync {
    /// Creates `definition` in `scope` for `application_id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::Error::Registration`] if the platform rejects the
    /// command.
    fn create_command(
        &self,
        application_id: ApplicationId,
        scope: Scope,
        definition: &CommandDefinition,
    ) -> impl Future<Output = Result<RegisteredCommand>> + Send;

    /// Deletes a previously created command.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::Error::Deregistration`] if the platform call fails.
    fn delete_command(
        &self,
        command: &RegisteredCommand,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// A connected gateway session for one shard.
pub trait ShardRuntime: CommandRemote + Sized {
    /// User the session is logged in as.
    fn current_user_id(&self) -> UserId;

    /// Application that owns the session's commands.
    fn application_id(&self) -> ApplicationId;

    /// Closes the session and waits for the gateway task to stop.
    fn close(self) -> impl Future<Output = ()> + Send;
}
