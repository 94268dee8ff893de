//! Process lifecycle: dependencies, shard start, command registration, shutdown.
//!
//! [`run`] drives the whole sequence on the calling task:
//!
//! 1. initialize dependencies (cache, relational store, worker pool)
//! 2. start the shard runtime and wait for it to be ready
//! 3. register the command catalog, if this shard owns global commands
//! 4. block until a termination signal, then tear down

/// Dependency initialization and the collaborator factory trait
pub mod dependencies;
/// Shard election for global side effects
pub mod election;
/// Slash-command registration
pub mod registrar;
/// Shard runtime capabilities
pub mod runtime;
/// Signal handling and teardown
pub mod shutdown;

use crate::config::{ConfigError, LogSink, RuntimeConfig};
use crate::errors::Result;
use crate::models::CommandDefinition;
use dependencies::{Backends, SCHEMA_SCRIPT_PATH};
use runtime::ShardRuntime;
use shutdown::{SHUTDOWN_GRACE, ShutdownOrchestrator};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

/// Version information baked in at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    /// Crate version
    pub version: &'static str,
    /// Commit hash (`GIT_COMMIT` at build time)
    pub commit: &'static str,
    /// Build date (`BUILD_DATE` at build time)
    pub date: &'static str,
}

impl BuildInfo {
    /// Build information of the running binary.
    #[must_use]
    pub const fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            commit: match option_env!("GIT_COMMIT") {
                Some(commit) => commit,
                None => "none",
            },
            date: match option_env!("BUILD_DATE") {
                Some(date) => date,
                None => "unknown",
            },
        }
    }
}

/// Everything the process resolved once at entry.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Resolved configuration
    pub config: Arc<RuntimeConfig>,
    /// Installed log destination
    pub log_sink: LogSink,
    /// Binary version information
    pub build: BuildInfo,
    /// Schema script applied by unmanaged deployments
    pub schema_script: PathBuf,
    /// Wait between the termination signal and command removal
    pub shutdown_grace: Duration,
}

impl AppContext {
    /// Resolves the configuration through `lookup` and builds the context.
    ///
    /// # Errors
    ///
    /// Returns the configuration error; no dependency has been touched yet.
    pub fn from_lookup<F>(
        lookup: F,
        log_sink: LogSink,
        build: BuildInfo,
    ) -> std::result::Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = RuntimeConfig::from_lookup(lookup)?;
        info!(
            shard = config.shard_index,
            num_shards = config.num_shards,
            managed = config.managed,
            "Configuration resolved"
        );
        Ok(Self {
            config: Arc::new(config),
            log_sink,
            build,
            schema_script: PathBuf::from(SCHEMA_SCRIPT_PATH),
            shutdown_grace: SHUTDOWN_GRACE,
        })
    }

    /// Overrides the grace interval before command removal.
    #[must_use]
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }
}

/// Runs the shard from dependency initialization to teardown.
///
/// Returns once `shutdown_signal` completes and teardown finishes.
///
/// # Errors
///
/// Fails if the worker pool client cannot be built, the shard runtime cannot start,
/// or the background schema bootstrap fails.
#[instrument(skip_all, fields(shard = ctx.config.shard_index))]
pub async fn run<B, F>(
    ctx: &AppContext,
    backends: &B,
    catalog: &[CommandDefinition],
    shutdown_signal: F,
) -> Result<()>
where
    B: Backends,
    F: Future<Output = ()>,
{
    let config = &ctx.config;
    let (fatal_tx, mut fatal_rx) = mpsc::unbounded_channel();

    let handles =
        dependencies::initialize(backends, config, &ctx.schema_script, &fatal_tx).await?;
    drop(fatal_tx);

    // A closed fatal channel disables its branch; only a reported error wins.
    let started = tokio::select! {
        started = backends.start_shard(Arc::clone(config), handles) => started,
        Some(e) = fatal_rx.recv() => Err(e),
    };
    let shard = started?;
    info!(
        user_id = %shard.current_user_id(),
        "Bot is now running. Press CTRL-C to exit."
    );

    let application_id = shard.application_id();
    let registered = tokio::select! {
        registered = registrar::register_commands(&shard, application_id, config, catalog) => {
            Ok(registered)
        }
        Some(e) = fatal_rx.recv() => Err(e),
    };
    let registered = match registered {
        Ok(registered) => registered,
        Err(e) => {
            error!("Fatal error during command registration, closing shard: {}", e);
            shard.close().await;
            return Err(e);
        }
    };

    ShutdownOrchestrator::new(
        shard,
        registered,
        config.owns_global_commands(),
        ctx.shutdown_grace,
    )
    .run(shutdown_signal, fatal_rx)
    .await
}
