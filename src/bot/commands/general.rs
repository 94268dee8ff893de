//! General Discord commands - help and info.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{bot::Context, errors::Result};
    use chrono::Utc;
    use poise::serenity_prelude as serenity;

    /// Lists the available commands.
    #[poise::command(slash_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = "**Commands**\n\
        • `/help` - Shows this help message.\n\
        • `/info` - Shows version, shard and service status.\n\
        • `/ranking` - Shows the win rate ranking of this server.";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows version, shard and service status.
    #[poise::command(slash_command)]
    pub async fn info(ctx: Context<'_>) -> Result<()> {
        let data = ctx.data();
        // Service checks can outlast the interaction deadline
        ctx.defer().await?;

        let cache_status = match &data.cache {
            Some(cache) => match cache.ping().await {
                Ok(()) => "online",
                Err(e) => {
                    tracing::warn!("Cache ping failed: {}", e);
                    "unreachable"
                }
            },
            None => "not connected",
        };
        let database_status = if data.database.is_some() {
            "connected"
        } else {
            "not connected"
        };
        let worker_pool_status = match data.worker_pool.probe().await {
            Ok(()) => format!("online ({})", data.worker_pool.base_url()),
            Err(e) => {
                tracing::warn!("Worker pool probe failed: {}", e);
                format!("unreachable ({})", data.worker_pool.base_url())
            }
        };
        let emoji_guild = data
            .config
            .emoji_guild_id
            .map_or_else(|| "not set".to_string(), |id| id.to_string());

        let uptime = Utc::now() - data.started_at;
        let embed = serenity::CreateEmbed::default()
            .title("Bot Info")
            .field(
                "Version",
                format!("{} ({})", data.build.version, data.build.commit),
                true,
            )
            .field(
                "Shard",
                format!("{}/{}", data.config.shard_index, data.config.num_shards),
                true,
            )
            .field(
                "Uptime",
                format!("{}h {}m", uptime.num_hours(), uptime.num_minutes() % 60),
                true,
            )
            .field("Cache", cache_status, true)
            .field("Database", database_status, true)
            .field("Worker pool", worker_pool_status, true)
            .field("Emoji guild", emoji_guild, true)
            .field("Gateway", &data.config.gateway_url, false)
            .color(serenity::Colour::DARK_GREEN)
            .timestamp(serenity::Timestamp::now());

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
