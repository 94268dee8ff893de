//! Gateway session for one shard.

use crate::bot::{BotData, commands, on_error};
use crate::config::RuntimeConfig;
use crate::errors::{Error, Result};
use crate::lifecycle::runtime::{CommandRemote, ShardRuntime};
use crate::models::{CommandDefinition, RegisteredCommand, Scope};
use poise::serenity_prelude as serenity;
use serenity::{ApplicationId, Command, Http, ShardManager, UserId};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// A running gateway session for the configured shard.
pub struct DiscordShard {
    shard_manager: Arc<ShardManager>,
    http: Arc<Http>,
    gateway: JoinHandle<()>,
    current_user_id: UserId,
    application_id: ApplicationId,
}

impl DiscordShard {
    /// Opens the gateway session for `config.shard_index` and waits until it is ready.
    ///
    /// Commands are not registered here; the framework only dispatches them.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built or the gateway closes before
    /// the ready event arrives.
    #[instrument(skip_all, fields(shard = config.shard_index, shards = config.num_shards))]
    pub async fn start(config: Arc<RuntimeConfig>, data: BotData) -> Result<Self> {
        let (ready_tx, ready_rx) = oneshot::channel();

        let framework = poise::Framework::builder()
            .options(poise::FrameworkOptions {
                commands: commands::all(),
                on_error: |error| Box::pin(on_error(error)),
                ..Default::default()
            })
            .setup(move |_ctx, ready, _framework| {
                Box::pin(async move {
                    info!("Logged in as {}", ready.user.name);
                    if ready_tx.send((ready.user.id, ready.application.id)).is_err() {
                        debug!("Ready event arrived after startup was abandoned");
                    }
                    Ok(data)
                })
            })
            .build();

        let intents = serenity::GatewayIntents::GUILDS
            | serenity::GatewayIntents::GUILD_VOICE_STATES
            | serenity::GatewayIntents::GUILD_MESSAGES;

        info!("Setting up Serenity client for Poise framework...");
        let mut client = serenity::ClientBuilder::new(&config.bot_token, intents)
            .framework(framework)
            .await?;

        let shard_manager = Arc::clone(&client.shard_manager);
        let http = Arc::clone(&client.http);
        let (shard_index, num_shards) = (config.shard_index, config.num_shards);

        let gateway = tokio::spawn(async move {
            if let Err(e) = client.start_shard(shard_index, num_shards).await {
                error!("Client error: {:?}", e);
            }
        });

        let Ok((current_user_id, application_id)) = ready_rx.await else {
            return Err(Error::Shard(
                "gateway closed before ready; is the token valid?".to_string(),
            ));
        };
        http.set_application_id(application_id);

        Ok(Self {
            shard_manager,
            http,
            gateway,
            current_user_id,
            application_id,
        })
    }
}

impl CommandRemote for DiscordShard {
    async fn create_command(
        &self,
        application_id: ApplicationId,
        scope: Scope,
        definition: &CommandDefinition,
    ) -> Result<RegisteredCommand> {
        let payload = definition.payload.clone();
        let created = match scope {
            Scope::Global => Command::create_global_command(&*self.http, payload).await,
            Scope::Guild(guild_id) => guild_id.create_command(&*self.http, payload).await,
        };

        let command = created.map_err(|e| Error::Registration {
            command: definition.name.clone(),
            scope,
            message: e.to_string(),
        })?;

        Ok(RegisteredCommand {
            scope,
            command_id: command.id,
            name: definition.name.clone(),
            application_id,
        })
    }

    async fn delete_command(&self, command: &RegisteredCommand) -> Result<()> {
        let deleted = match command.scope {
            Scope::Global => Command::delete_global_command(&*self.http, command.command_id).await,
            Scope::Guild(guild_id) => {
                guild_id
                    .delete_command(&*self.http, command.command_id)
                    .await
            }
        };

        deleted.map_err(|e| Error::Deregistration {
            command: command.name.clone(),
            scope: command.scope,
            message: e.to_string(),
        })
    }
}

impl ShardRuntime for DiscordShard {
    fn current_user_id(&self) -> UserId {
        self.current_user_id
    }

    fn application_id(&self) -> ApplicationId {
        self.application_id
    }

    async fn close(self) {
        info!("Closing gateway session...");
        self.shard_manager.shutdown_all().await;
        if let Err(e) = self.gateway.await {
            warn!("Gateway task ended abnormally: {}", e);
        }
    }
}
