//! `/ranking` - win rate ranking of the current guild.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::Context,
        config::LocaleCatalog,
        core::ranking::{self, RANKING_LIMIT},
        errors::Result,
    };
    use poise::serenity_prelude as serenity;

    /// Embed colour of the ranking reply
    pub const RANKING_COLOUR: serenity::Colour = serenity::Colour::DARK_GREEN;

    /// Show stats ranking of this guild
    #[poise::command(slash_command, guild_only)]
    pub async fn ranking(ctx: Context<'_>) -> Result<()> {
        let data = ctx.data();
        let locale = &data.locale;

        let Some(guild_id) = ctx.guild_id() else {
            ctx.say(locale.localize(
                "commands.ranking.noGuild",
                "Rankings are only available inside a server",
            ))
            .await?;
            return Ok(());
        };

        let Some(database) = &data.database else {
            ctx.say(locale.localize(
                "commands.ranking.noDatabase",
                "Statistics are unavailable right now",
            ))
            .await?;
            return Ok(());
        };

        let mut rows = database.guild_ranking(guild_id, RANKING_LIMIT).await?;
        ranking::rank(&mut rows);

        let body = if rows.is_empty() {
            locale
                .localize("commands.ranking.empty", "No games recorded yet")
                .to_string()
        } else {
            ranking::format_ranking(&rows)
        };

        ctx.send(poise::CreateReply::default().embed(ranking_embed(locale, body)))
            .await?;
        Ok(())
    }

    /// Builds the localized ranking embed around a pre-formatted body.
    #[must_use]
    pub fn ranking_embed(locale: &LocaleCatalog, body: String) -> serenity::CreateEmbed {
        serenity::CreateEmbed::default()
            .title(locale.localize("commands.ranking.title", "Bot Info"))
            .timestamp(serenity::Timestamp::now())
            .color(RANKING_COLOUR)
            .field(
                locale.localize("commands.ranking.win", "Win Rate Ranking"),
                body,
                true,
            )
    }
}

pub use inner::*;
