//! Shared test utilities.
//!
//! Provides stub collaborators that record every call they receive, so lifecycle
//! tests can assert on ordering and election without any network dependency.

use crate::config::{CacheParams, DatabaseParams, RuntimeConfig};
use crate::errors::{Error, Result};
use crate::lifecycle::dependencies::{Backends, DependencyHandles};
use crate::lifecycle::runtime::{CommandRemote, ShardRuntime};
use crate::models::{CommandDefinition, RegisteredCommand, Scope};
use poise::serenity_prelude::{ApplicationId, CommandId, UserId};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Application id reported by [`StubShard`].
pub const STUB_APPLICATION_ID: u64 = 4242;
/// User id reported by [`StubShard`].
pub const STUB_USER_ID: u64 = 2424;

pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// A call observed by a stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ConnectCache,
    ConnectDatabase,
    ConnectWorkerPool(String),
    BootstrapSchema(PathBuf),
    StartShard {
        shard_index: u32,
        num_shards: u32,
        cache: bool,
        database: bool,
    },
    Create {
        application_id: ApplicationId,
        scope: Scope,
        name: String,
    },
    Delete {
        application_id: ApplicationId,
        scope: Scope,
        command_id: CommandId,
    },
    Close,
}

/// Shared, ordered record of stub calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.0.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }
}

/// Collaborator factory whose dependencies succeed unless told otherwise.
#[derive(Debug, Clone, Default)]
pub struct StubBackends {
    pub log: CallLog,
    pub fail_cache: bool,
    pub fail_database: bool,
    pub fail_worker_pool: bool,
    pub fail_bootstrap: bool,
    /// `start_shard` never completes, as when the gateway never becomes ready
    pub stall_shard_start: bool,
    pub failing_creates: Vec<String>,
    pub failing_deletes: Vec<String>,
}

/// Relational store stand-in; carries the log into the bootstrap task.
#[derive(Debug, Clone)]
pub struct StubDatabase {
    log: CallLog,
    fail_bootstrap: bool,
}

impl Backends for StubBackends {
    type Cache = ();
    type Database = StubDatabase;
    type WorkerPool = String;
    type Shard = StubShard;

    async fn connect_cache(&self, _params: &CacheParams) -> Result<()> {
        self.log.push(Call::ConnectCache);
        if self.fail_cache {
            return Err(Error::Cache {
                operation: "connect",
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    async fn connect_database(&self, _params: &DatabaseParams) -> Result<StubDatabase> {
        self.log.push(Call::ConnectDatabase);
        if self.fail_database {
            return Err(Error::Database {
                operation: "connect",
                source: sea_orm::DbErr::Custom("connection refused".to_string()),
            });
        }
        Ok(StubDatabase {
            log: self.log.clone(),
            fail_bootstrap: self.fail_bootstrap,
        })
    }

    async fn connect_worker_pool(&self, address: &str) -> Result<String> {
        self.log.push(Call::ConnectWorkerPool(address.to_string()));
        if self.fail_worker_pool {
            return Err(Error::WorkerPool {
                address: address.to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(address.to_string())
    }

    async fn bootstrap_schema(database: StubDatabase, script: PathBuf) -> Result<()> {
        database.log.push(Call::BootstrapSchema(script.clone()));
        if database.fail_bootstrap {
            return Err(Error::SchemaBootstrap {
                path: script.display().to_string(),
                message: "relation already exists".to_string(),
            });
        }
        Ok(())
    }

    async fn start_shard(
        &self,
        config: Arc<RuntimeConfig>,
        handles: DependencyHandles<Self>,
    ) -> Result<StubShard> {
        self.log.push(Call::StartShard {
            shard_index: config.shard_index,
            num_shards: config.num_shards,
            cache: handles.cache.is_some(),
            database: handles.database.is_some(),
        });
        if self.stall_shard_start {
            return std::future::pending().await;
        }
        Ok(StubShard {
            log: self.log.clone(),
            failing_creates: self.failing_creates.clone(),
            failing_deletes: self.failing_deletes.clone(),
            ..StubShard::default()
        })
    }
}

/// Shard runtime stand-in that hands out sequential command ids.
#[derive(Debug)]
pub struct StubShard {
    pub log: CallLog,
    pub failing_creates: Vec<String>,
    pub failing_deletes: Vec<String>,
    pub next_command_id: AtomicU64,
}

impl Default for StubShard {
    fn default() -> Self {
        Self {
            log: CallLog::default(),
            failing_creates: Vec::new(),
            failing_deletes: Vec::new(),
            next_command_id: AtomicU64::new(100),
        }
    }
}

impl CommandRemote for StubShard {
    async fn create_command(
        &self,
        application_id: ApplicationId,
        scope: Scope,
        definition: &CommandDefinition,
    ) -> Result<RegisteredCommand> {
        self.log.push(Call::Create {
            application_id,
            scope,
            name: definition.name.clone(),
        });
        if self.failing_creates.contains(&definition.name) {
            return Err(Error::Registration {
                command: definition.name.clone(),
                scope,
                message: "400 Bad Request".to_string(),
            });
        }
        Ok(RegisteredCommand {
            scope,
            command_id: CommandId::new(self.next_command_id.fetch_add(1, Ordering::SeqCst)),
            name: definition.name.clone(),
            application_id,
        })
    }

    async fn delete_command(&self, command: &RegisteredCommand) -> Result<()> {
        self.log.push(Call::Delete {
            application_id: command.application_id,
            scope: command.scope,
            command_id: command.command_id,
        });
        if self.failing_deletes.contains(&command.name) {
            return Err(Error::Deregistration {
                command: command.name.clone(),
                scope: command.scope,
                message: "404 Unknown application command".to_string(),
            });
        }
        Ok(())
    }
}

impl ShardRuntime for StubShard {
    fn current_user_id(&self) -> UserId {
        UserId::new(STUB_USER_ID)
    }

    fn application_id(&self) -> ApplicationId {
        ApplicationId::new(STUB_APPLICATION_ID)
    }

    async fn close(self) {
        self.log.push(Call::Close);
    }
}

/// Command catalog with one definition per name.
pub fn catalog(names: &[&str]) -> Vec<CommandDefinition> {
    names
        .iter()
        .map(|name| CommandDefinition::new(*name, format!("{name} command")))
        .collect()
}

/// Environment lookup with every required key set, plus `overrides`.
pub fn env_lookup(overrides: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
    let mut env: HashMap<String, String> = [
        ("DISCORD_BOT_TOKEN", "token"),
        ("REDIS_ADDR", "redis:6379"),
        ("POSTGRES_ADDR", "postgres:5432"),
        ("POSTGRES_USER", "automuteus"),
        ("POSTGRES_PASS", "secret"),
        ("GALACTUS_ADDR", "http://galactus:5858"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (key, value) in overrides {
        env.insert((*key).to_string(), (*value).to_string());
    }
    move |key: &str| env.get(key).cloned()
}

/// Configuration for an unmanaged single-shard deployment.
pub fn test_config() -> RuntimeConfig {
    RuntimeConfig::from_lookup(env_lookup(&[])).unwrap()
}
