//! Production collaborators: redis, postgres, the worker pool and the Discord gateway.

use crate::bot::{BotData, DiscordShard};
use crate::config::{CacheParams, DatabaseParams, LocaleCatalog, RuntimeConfig};
use crate::errors::Result;
use crate::lifecycle::BuildInfo;
use crate::lifecycle::dependencies::{Backends, DependencyHandles};
use crate::storage::{Cache, Postgres, WorkerPool};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;

/// Connects the real backing services and opens the real gateway session.
pub struct DiscordBackends {
    locale: Arc<LocaleCatalog>,
    build: BuildInfo,
}

impl DiscordBackends {
    /// Creates the factory; `locale` and `build` are handed to every command.
    #[must_use]
    pub fn new(locale: LocaleCatalog, build: BuildInfo) -> Self {
        Self {
            locale: Arc::new(locale),
            build,
        }
    }
}

impl Backends for DiscordBackends {
    type Cache = Cache;
    type Database = Postgres;
    type WorkerPool = WorkerPool;
    type Shard = DiscordShard;

    async fn connect_cache(&self, params: &CacheParams) -> Result<Cache> {
        Cache::connect(params).await
    }

    async fn connect_database(&self, params: &DatabaseParams) -> Result<Postgres> {
        Postgres::connect(params).await
    }

    async fn connect_worker_pool(&self, address: &str) -> Result<WorkerPool> {
        WorkerPool::connect(address).await
    }

    async fn bootstrap_schema(database: Postgres, script: PathBuf) -> Result<()> {
        database.execute_script(&script).await
    }

    async fn start_shard(
        &self,
        config: Arc<RuntimeConfig>,
        handles: DependencyHandles<Self>,
    ) -> Result<DiscordShard> {
        let data = BotData {
            config: Arc::clone(&config),
            cache: handles.cache,
            database: handles.database,
            worker_pool: handles.worker_pool,
            locale: Arc::clone(&self.locale),
            build: self.build.clone(),
            started_at: Utc::now(),
        };
        DiscordShard::start(config, data).await
    }
}
