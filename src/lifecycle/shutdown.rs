//! Signal handling and teardown.
//!
//! The orchestrator is consumed by [`ShutdownOrchestrator::run`], so a process
//! tears down at most once no matter how many signals arrive.

use crate::errors::{Error, Result};
use crate::lifecycle::runtime::ShardRuntime;
use crate::models::RegisteredCommands;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Time allowed for in-flight interactions before commands are removed.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Owns the shard session and its registered commands until shutdown.
pub struct ShutdownOrchestrator<S: ShardRuntime> {
    shard: S,
    registered: RegisteredCommands,
    owns_global_commands: bool,
    grace: Duration,
}

impl<S: ShardRuntime> ShutdownOrchestrator<S> {
    /// Takes ownership of the running shard and what it registered.
    #[must_use]
    pub const fn new(
        shard: S,
        registered: RegisteredCommands,
        owns_global_commands: bool,
        grace: Duration,
    ) -> Self {
        Self {
            shard,
            registered,
            owns_global_commands,
            grace,
        }
    }

    /// Blocks until `signal` completes or a fatal error arrives, then tears down.
    ///
    /// After a signal: waits the grace interval, deletes every registered command
    /// (when this shard owns them) and closes the shard.
    ///
    /// # Errors
    ///
    /// Returns the first error received on `fatal`. The shard is closed but its
    /// commands are left in place.
    pub async fn run<F>(self, signal: F, mut fatal: mpsc::UnboundedReceiver<Error>) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            () = signal => {
                info!(
                    "Received Sigterm or Kill signal. Bot will terminate in {:?}",
                    self.grace
                );
            }
            Some(e) = fatal.recv() => {
                error!("Fatal error while running, closing shard: {}", e);
                self.shard.close().await;
                return Err(e);
            }
        }

        tokio::time::sleep(self.grace).await;

        if self.owns_global_commands {
            self.deregister_commands().await;
        } else {
            info!("Shard does not own commands; leaving them registered");
        }

        self.shard.close().await;
        info!("Shard closed");
        Ok(())
    }

    /// Deletes every recorded command in registration order, best effort.
    async fn deregister_commands(&self) {
        info!(count = self.registered.len(), "Deleting slash commands");
        for command in &self.registered {
            info!(command = %command.name, guild = %command.scope, "delete command");
            if let Err(e) = self.shard.delete_command(command).await {
                error!("{}", e);
            }
        }
        info!("Finished deleting all commands");
    }
}

/// Process termination listeners.
///
/// Handlers are registered by [`ShutdownSignal::install`], so a SIGINT or SIGTERM
/// that arrives while the shard is still starting or registering commands is held
/// until [`ShutdownSignal::recv`] is polled instead of killing the process.
#[derive(Debug)]
pub struct ShutdownSignal {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignal {
    /// Registers the SIGINT and SIGTERM handlers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if a handler cannot be registered.
    #[cfg(unix)]
    pub fn install() -> Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Registers the Ctrl-C handler.
    ///
    /// # Errors
    ///
    /// Never fails on this platform.
    #[cfg(not(unix))]
    pub fn install() -> Result<Self> {
        Ok(Self {})
    }

    /// Completes on the first SIGINT or SIGTERM received since [`Self::install`].
    #[cfg(unix)]
    pub async fn recv(mut self) {
        tokio::select! {
            _ = self.interrupt.recv() => info!("Received SIGINT"),
            _ = self.terminate.recv() => info!("Received SIGTERM"),
        }
    }

    /// Completes on the first Ctrl-C.
    #[cfg(not(unix))]
    pub async fn recv(self) {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Unable to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RegisteredCommand, Scope};
    use crate::test_utils::{Call, STUB_APPLICATION_ID, StubShard};
    use poise::serenity_prelude::{ApplicationId, CommandId, GuildId};
    use std::future::{pending, ready};

    fn record(scope: Scope, name: &str, id: u64) -> RegisteredCommand {
        RegisteredCommand {
            scope,
            command_id: CommandId::new(id),
            name: name.to_string(),
            application_id: ApplicationId::new(STUB_APPLICATION_ID),
        }
    }

    fn recorded() -> RegisteredCommands {
        let guild = Scope::Guild(GuildId::new(1001));
        let mut commands = RegisteredCommands::new();
        commands.record(record(Scope::Global, "A", 11));
        commands.record(record(Scope::Global, "B", 12));
        commands.record(record(guild, "A", 13));
        commands.record(record(guild, "B", 14));
        commands
    }

    fn deletes(calls: &[Call]) -> Vec<Call> {
        calls
            .iter()
            .filter(|c| matches!(c, Call::Delete { .. }))
            .cloned()
            .collect()
    }

    #[tokio::test]
    async fn test_every_record_is_deleted_once_then_shard_closes() {
        let shard = StubShard::default();
        let log = shard.log.clone();
        let (_tx, rx) = mpsc::unbounded_channel();

        ShutdownOrchestrator::new(shard, recorded(), true, Duration::ZERO)
            .run(ready(()), rx)
            .await
            .unwrap();

        let expected: Vec<Call> = recorded()
            .iter()
            .map(|c| Call::Delete {
                application_id: c.application_id,
                scope: c.scope,
                command_id: c.command_id,
            })
            .collect();
        let calls = log.calls();
        assert_eq!(deletes(&calls), expected);
        assert_eq!(calls.last(), Some(&Call::Close));
    }

    #[tokio::test]
    async fn test_failed_deletion_does_not_stop_the_rest() {
        let shard = StubShard {
            failing_deletes: vec!["A".to_string()],
            ..StubShard::default()
        };
        let log = shard.log.clone();
        let (_tx, rx) = mpsc::unbounded_channel();

        ShutdownOrchestrator::new(shard, recorded(), true, Duration::ZERO)
            .run(ready(()), rx)
            .await
            .unwrap();

        assert_eq!(deletes(&log.calls()).len(), 4);
        assert_eq!(log.count(|c| *c == Call::Close), 1);
    }

    #[tokio::test]
    async fn test_non_owner_skips_deletion_but_closes() {
        let shard = StubShard::default();
        let log = shard.log.clone();
        let (_tx, rx) = mpsc::unbounded_channel();

        ShutdownOrchestrator::new(shard, recorded(), false, Duration::ZERO)
            .run(ready(()), rx)
            .await
            .unwrap();

        assert_eq!(log.calls(), vec![Call::Close]);
    }

    #[tokio::test]
    async fn test_fatal_error_closes_without_deleting() {
        let shard = StubShard::default();
        let log = shard.log.clone();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Error::SchemaBootstrap {
            path: "./storage/postgres.sql".to_string(),
            message: "syntax error".to_string(),
        })
        .unwrap();

        let result = ShutdownOrchestrator::new(shard, recorded(), true, Duration::ZERO)
            .run(pending::<()>(), rx)
            .await;

        assert!(matches!(result, Err(Error::SchemaBootstrap { .. })));
        assert_eq!(log.calls(), vec![Call::Close]);
    }

    #[tokio::test]
    async fn test_closed_fatal_channel_still_waits_for_signal() {
        let shard = StubShard::default();
        let log = shard.log.clone();
        let (tx, rx) = mpsc::unbounded_channel::<Error>();
        drop(tx);

        ShutdownOrchestrator::new(shard, RegisteredCommands::new(), true, Duration::ZERO)
            .run(tokio::time::sleep(Duration::from_millis(5)), rx)
            .await
            .unwrap();

        assert_eq!(log.calls(), vec![Call::Close]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_terminate_before_recv_is_held_until_polled() {
        let signal = ShutdownSignal::install().unwrap();

        let status = std::process::Command::new("sh")
            .arg("-c")
            .arg(format!("kill -TERM {}", std::process::id()))
            .status()
            .unwrap();
        assert!(status.success());

        tokio::time::timeout(Duration::from_secs(5), signal.recv())
            .await
            .expect("SIGTERM should be delivered to the installed handler");
    }
}
