//! Runtime configuration for one shard process.
//!
//! Everything is read once at startup into an immutable [`RuntimeConfig`]. Required
//! variables fail fast with [`ConfigError::MissingEnvVar`]; numeric variables that are
//! absent or do not parse fall back to their defaults instead of failing.

use crate::config::{
    CacheParams, ConfigError, DatabaseParams, LocaleSettings, LoggingSettings, non_empty,
};
use crate::lifecycle::election;
use crate::models::Scope;
use poise::serenity_prelude::GuildId;
use tracing::{info, warn};

/// Companion gateway URL used when `HOST` is unset.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8123";

/// Fully resolved configuration of a shard process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Platform authentication token (`DISCORD_BOT_TOKEN`)
    pub bot_token: String,
    /// Base URL of the companion gateway service (`HOST`)
    pub gateway_url: String,
    /// Index of this shard (`SHARD_ID`)
    pub shard_index: u32,
    /// Total number of shards (`NUM_SHARDS`)
    pub num_shards: u32,
    /// Cache store parameters
    pub cache: CacheParams,
    /// Relational store parameters
    pub database: DatabaseParams,
    /// Worker pool address (`GALACTUS_ADDR`)
    pub worker_pool_address: String,
    /// Schema and shard coordination are handled externally (`AUTOMUTEUS_OFFICIAL`)
    pub managed: bool,
    /// Scopes commands are registered in, in order
    pub command_scopes: Vec<Scope>,
    /// Log sink settings
    pub logging: LoggingSettings,
    /// Locale catalog settings
    pub locale: LocaleSettings,
    /// Guild hosting the bot's custom emoji (`EMOJI_GUILD_ID`)
    pub emoji_guild_id: Option<GuildId>,
}

impl RuntimeConfig {
    /// Resolves the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Fails when a required key is missing, when `SHARD_ID` is not below the shard
    /// count, when a command scope is not a guild id, or when `WORKER_BOT_TOKENS` is
    /// set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| {
            non_empty(&lookup, key).ok_or(ConfigError::MissingEnvVar(key))
        };

        if non_empty(&lookup, "WORKER_BOT_TOKENS").is_some() {
            return Err(ConfigError::RelocatedWorkerTokens);
        }

        let bot_token = require("DISCORD_BOT_TOKEN")?;

        let num_shards = parse_num_shards(non_empty(&lookup, "NUM_SHARDS").as_deref());
        let shard_index =
            parse_shard_index(non_empty(&lookup, "SHARD_ID").as_deref(), num_shards)?;

        let cache = CacheParams {
            address: require("REDIS_ADDR")?,
            password: non_empty(&lookup, "REDIS_PASS"),
        };
        let database = DatabaseParams {
            address: require("POSTGRES_ADDR")?,
            user: require("POSTGRES_USER")?,
            password: require("POSTGRES_PASS")?,
        };
        let worker_pool_address = require("GALACTUS_ADDR")?;

        let gateway_url = non_empty(&lookup, "HOST").unwrap_or_else(|| {
            info!("No valid HOST provided. Defaulting to {}", DEFAULT_GATEWAY_URL);
            DEFAULT_GATEWAY_URL.to_string()
        });

        let command_scopes = parse_scopes(lookup("SLASH_COMMAND_GUILD_IDS").as_deref())?;

        Ok(Self {
            bot_token,
            gateway_url,
            shard_index,
            num_shards,
            cache,
            database,
            worker_pool_address,
            managed: non_empty(&lookup, "AUTOMUTEUS_OFFICIAL").is_some(),
            command_scopes,
            logging: LoggingSettings::from_lookup(&lookup),
            locale: LocaleSettings::from_lookup(&lookup),
            emoji_guild_id: parse_emoji_guild(non_empty(&lookup, "EMOJI_GUILD_ID").as_deref()),
        })
    }

    /// Whether this shard registers and removes the global command surface.
    #[must_use]
    pub const fn owns_global_commands(&self) -> bool {
        election::owns_global_commands(self.managed, self.shard_index)
    }
}

/// Shard count, defaulting to 1 when absent or unparsable.
///
/// An explicit `0` is kept so that [`parse_shard_index`] rejects it.
fn parse_num_shards(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok()).unwrap_or(1)
}

/// Shard index, defaulting to 0 when absent or unparsable, and always below
/// `num_shards`.
fn parse_shard_index(raw: Option<&str>, num_shards: u32) -> Result<u32, ConfigError> {
    let shard_index = raw
        .and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(0);
    if shard_index >= num_shards {
        return Err(ConfigError::ShardOutOfRange {
            shard_index,
            num_shards,
        });
    }
    Ok(shard_index)
}

fn parse_emoji_guild(raw: Option<&str>) -> Option<GuildId> {
    let raw = raw?;
    let guild_id = parse_guild_id(raw);
    if guild_id.is_none() {
        warn!("Ignoring EMOJI_GUILD_ID {:?}: not a guild id", raw);
    }
    guild_id
}

fn parse_guild_id(raw: &str) -> Option<GuildId> {
    raw.parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(GuildId::new)
}

/// Command scopes from a comma-separated guild id list.
///
/// Spaces are ignored. An unset or blank list means global only; an empty item
/// inside the list also stands for the global scope.
fn parse_scopes(raw: Option<&str>) -> Result<Vec<Scope>, ConfigError> {
    let compact: String = raw.unwrap_or_default().chars().filter(|c| *c != ' ').collect();
    if compact.is_empty() {
        return Ok(vec![Scope::Global]);
    }

    compact
        .split(',')
        .map(|item| {
            if item.is_empty() {
                Ok(Scope::Global)
            } else {
                parse_guild_id(item)
                    .map(Scope::Guild)
                    .ok_or_else(|| ConfigError::InvalidGuildId(item.to_string()))
            }
        })
        .collect()
}
