//! Postgres relational store.
//!
//! Uses `SeaORM` over sqlx. The schema is plain SQL shipped with the binary and
//! applied by [`Postgres::execute_script`] in unmanaged deployments.

use crate::config::DatabaseParams;
use crate::core::ranking::RankingRow;
use crate::errors::{Error, Result};
use poise::serenity_prelude::GuildId;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, DbBackend, FromQueryResult, Statement,
};
use std::path::Path;
use tracing::{info, instrument};

const GUILD_RANKING_SQL: &str = r"
SELECT user_id,
       COUNT(*) FILTER (WHERE player_won) AS wins,
       COUNT(*) AS games
FROM users_games
WHERE guild_id = $1
GROUP BY user_id
ORDER BY COUNT(*) FILTER (WHERE player_won)::float8 / COUNT(*) DESC, COUNT(*) DESC
LIMIT $2";

/// Shared handle to the relational store.
#[derive(Debug, Clone)]
pub struct Postgres {
    conn: DatabaseConnection,
}

impl Postgres {
    /// Connects to the relational store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the server cannot be reached or rejects the
    /// credentials.
    #[instrument(skip(params), fields(address = %params.address, user = %params.user))]
    pub async fn connect(params: &DatabaseParams) -> Result<Self> {
        let conn = Database::connect(params.url())
            .await
            .map_err(|source| Error::Database {
                operation: "connect",
                source,
            })?;
        Ok(Self { conn })
    }

    /// Reads the SQL file at `path` and executes it as one batch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaBootstrap`] if the file cannot be read or any
    /// statement fails.
    #[instrument(skip(self))]
    pub async fn execute_script(&self, path: &Path) -> Result<()> {
        let failure = |message: String| Error::SchemaBootstrap {
            path: path.display().to_string(),
            message,
        };

        let script = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| failure(e.to_string()))?;
        self.conn
            .execute_unprepared(&script)
            .await
            .map_err(|e| failure(e.to_string()))?;

        info!("Schema script applied");
        Ok(())
    }

    /// Best win rates recorded in a guild, highest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Database`] if the query fails.
    pub async fn guild_ranking(&self, guild_id: GuildId, limit: u64) -> Result<Vec<RankingRow>> {
        #[allow(clippy::cast_possible_wrap)] // snowflakes fit in 63 bits
        let guild_id = guild_id.get() as i64;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let statement = Statement::from_sql_and_values(
            DbBackend::Postgres,
            GUILD_RANKING_SQL,
            [guild_id.into(), limit.into()],
        );

        RankingRow::find_by_statement(statement)
            .all(&self.conn)
            .await
            .map_err(|source| Error::Database {
                operation: "guild ranking",
                source,
            })
    }
}
