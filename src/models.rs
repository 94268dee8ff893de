//! Value types shared by the registrar, the shutdown path and the shard runtime.

use poise::serenity_prelude::{ApplicationId, CommandId, CreateCommand, GuildId};
use std::fmt;

/// Registration boundary for a slash command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Visible in every guild the application is installed in
    Global,
    /// Visible only in one guild
    Guild(GuildId),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("GLOBAL"),
            Self::Guild(id) => write!(f, "guild {id}"),
        }
    }
}

/// A slash command as it is sent to the platform.
#[derive(Debug, Clone)]
pub struct CommandDefinition {
    /// Command name, unique per scope
    pub name: String,
    /// Short description shown in the client
    pub description: String,
    /// Serialized registration payload
    pub payload: CreateCommand,
}

impl CommandDefinition {
    /// Builds a definition with no options.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        let description = description.into();
        let payload = CreateCommand::new(name.clone()).description(description.clone());
        Self {
            name,
            description,
            payload,
        }
    }

    /// Converts a framework command into its registration payload.
    ///
    /// Returns `None` for commands that are not exposed as slash commands.
    #[must_use]
    pub fn from_framework<U, E>(command: &poise::Command<U, E>) -> Option<Self> {
        let payload = command.create_as_slash_command()?;
        Some(Self {
            name: command.name.clone(),
            description: command.description.clone().unwrap_or_default(),
            payload,
        })
    }
}

/// A command the platform accepted, kept so it can be removed at shutdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredCommand {
    /// Scope the command was created in
    pub scope: Scope,
    /// Identifier assigned by the platform
    pub command_id: CommandId,
    /// Command name as registered
    pub name: String,
    /// Application owning the command
    pub application_id: ApplicationId,
}

/// Commands created by this process, in the order they were created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisteredCommands(Vec<RegisteredCommand>);

impl RegisteredCommands {
    /// Creates an empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a successful registration.
    pub fn record(&mut self, command: RegisteredCommand) {
        self.0.push(command);
    }

    /// Number of recorded commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, RegisteredCommand> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a RegisteredCommands {
    type Item = &'a RegisteredCommand;
    type IntoIter = std::slice::Iter<'a, RegisteredCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
