//! Slash-command registration.

use crate::config::RuntimeConfig;
use crate::lifecycle::runtime::CommandRemote;
use crate::models::{CommandDefinition, RegisteredCommands};
use poise::serenity_prelude::ApplicationId;
use tracing::{error, info, instrument};

/// Creates every catalog command in every configured scope.
///
/// Scopes are walked in configuration order and commands in catalog order; the
/// returned record keeps that order. A failed creation is logged and skipped.
/// Nothing is registered unless this shard owns global commands.
#[instrument(skip_all, fields(shard = config.shard_index, managed = config.managed))]
pub async fn register_commands<R: CommandRemote>(
    remote: &R,
    application_id: ApplicationId,
    config: &RuntimeConfig,
    catalog: &[CommandDefinition],
) -> RegisteredCommands {
    let mut registered = RegisteredCommands::new();

    if !config.owns_global_commands() {
        info!(
            "Shard {} of a managed deployment does not register commands",
            config.shard_index
        );
        return registered;
    }

    for scope in &config.command_scopes {
        for definition in catalog {
            info!(command = %definition.name, guild = %scope, "register command");
            match remote
                .create_command(application_id, *scope, definition)
                .await
            {
                Ok(command) => registered.record(command),
                Err(e) => error!("{}", e),
            }
        }
    }

    info!(count = registered.len(), "Finished registering all commands");
    registered
}
