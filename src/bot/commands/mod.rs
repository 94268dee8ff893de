//! Slash-command catalog.

/// Help and info commands
pub mod general;

/// Guild win-rate ranking
pub mod ranking;

use crate::bot::BotData;
use crate::errors::Error;
use crate::models::CommandDefinition;

pub use general::*;
pub use ranking::*;

/// Every command the bot serves, in registration order.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![help(), info(), ranking()]
}

/// Registration payloads for [`all`].
#[must_use]
pub fn definitions() -> Vec<CommandDefinition> {
    all()
        .iter()
        .filter_map(CommandDefinition::from_framework)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definitions_follow_catalog_order() {
        let names: Vec<String> = definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["help", "info", "ranking"]);
    }

    #[test]
    fn test_definitions_have_short_descriptions() {
        for definition in definitions() {
            assert!(!definition.description.is_empty(), "{}", definition.name);
            assert!(definition.description.len() <= 100, "{}", definition.name);
        }
    }
}
