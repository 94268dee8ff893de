//! Framework-agnostic logic used by the bot's commands.

/// Guild win-rate ranking
pub mod ranking;
