//! Dependency initialization.
//!
//! Backing services are brought up strictly in order: cache, relational store,
//! worker pool. The first two are allowed to fail (the shard keeps running in a
//! degraded mode); the worker pool is not. When the deployment is unmanaged, the
//! schema script is applied in a background task as soon as the relational store is
//! connected, and a failure there is reported on the fatal-error channel.

use crate::config::{CacheParams, DatabaseParams, RuntimeConfig};
use crate::errors::{Error, Result};
use crate::lifecycle::runtime::ShardRuntime;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

/// Location of the bundled schema script.
pub const SCHEMA_SCRIPT_PATH: &str = "./storage/postgres.sql";

/// Factory for every collaborator the shard depends on.
pub trait Backends: Send + Sync + Sized + 'static {
    /// Cache store handle
    type Cache: Send + Sync + 'static;
    /// Relational store handle
    type Database: Clone + Send + Sync + 'static;
    /// Worker pool client
    type WorkerPool: Send + Sync + 'static;
    /// Gateway session for one shard
    type Shard: ShardRuntime;

    /// Connects the cache store.
    fn connect_cache(
        &self,
        params: &CacheParams,
    ) -> impl Future<Output = Result<Self::Cache>> + Send;

    /// Connects the relational store.
    fn connect_database(
        &self,
        params: &DatabaseParams,
    ) -> impl Future<Output = Result<Self::Database>> + Send;

    /// Builds the worker pool client.
    fn connect_worker_pool(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<Self::WorkerPool>> + Send;

    /// Applies the schema script at `script` to `database`.
    fn bootstrap_schema(
        database: Self::Database,
        script: PathBuf,
    ) -> impl Future<Output = Result<()>> + Send + 'static;

    /// Starts the gateway session, handing it the initialized dependencies.
    fn start_shard(
        &self,
        config: Arc<RuntimeConfig>,
        handles: DependencyHandles<Self>,
    ) -> impl Future<Output = Result<Self::Shard>> + Send;
}

/// Dependencies produced by [`initialize`].
///
/// `None` marks a dependency that failed to connect.
pub struct DependencyHandles<B: Backends> {
    /// Cache store, if it connected
    pub cache: Option<B::Cache>,
    /// Relational store, if it connected
    pub database: Option<B::Database>,
    /// Worker pool client
    pub worker_pool: B::WorkerPool,
}

/// Brings up every dependency in order.
///
/// # Errors
///
/// Returns the worker pool error if its client cannot be built. Cache and database
/// failures are logged and do not fail initialization.
#[instrument(skip_all, fields(managed = config.managed))]
pub async fn initialize<B: Backends>(
    backends: &B,
    config: &RuntimeConfig,
    schema_script: &Path,
    fatal: &mpsc::UnboundedSender<Error>,
) -> Result<DependencyHandles<B>> {
    let cache = match backends.connect_cache(&config.cache).await {
        Ok(cache) => {
            info!("Cache store connected");
            Some(cache)
        }
        Err(e) => {
            error!("Cache store unavailable, continuing without it: {}", e);
            None
        }
    };

    let database = match backends.connect_database(&config.database).await {
        Ok(database) => {
            info!("Relational store connected");
            Some(database)
        }
        Err(e) => {
            error!("Relational store unavailable, continuing without it: {}", e);
            None
        }
    };

    match (&database, config.managed) {
        (_, true) => info!("Managed deployment; schema bootstrap skipped"),
        (Some(database), false) => {
            spawn_schema_bootstrap::<B>(
                database.clone(),
                schema_script.to_path_buf(),
                fatal.clone(),
            );
        }
        (None, false) => warn!("Relational store not connected; schema bootstrap skipped"),
    }

    let worker_pool = backends
        .connect_worker_pool(&config.worker_pool_address)
        .await
        .inspect(|_| info!("Worker pool client ready"))
        .inspect_err(|e| error!("Failed to build worker pool client: {}", e))?;

    Ok(DependencyHandles {
        cache,
        database,
        worker_pool,
    })
}

/// Applies the schema script in the background.
///
/// A failure is logged and forwarded on `fatal`, where the shutdown path picks it
/// up and terminates the process.
fn spawn_schema_bootstrap<B: Backends>(
    database: B::Database,
    script: PathBuf,
    fatal: mpsc::UnboundedSender<Error>,
) {
    info!("Applying schema from {}", script.display());
    tokio::spawn(async move {
        match B::bootstrap_schema(database, script).await {
            Ok(()) => info!("Schema bootstrap finished"),
            Err(e) => {
                error!("Schema bootstrap failed: {}", e);
                if fatal.send(e).is_err() {
                    warn!("Fatal-error channel already closed; process is exiting");
                }
            }
        }
    });
}
