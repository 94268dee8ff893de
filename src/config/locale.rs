//! Locale catalog loading.
//!
//! A catalog is a flat TOML table of message ids to translated text, stored as
//! `<LOCALE_PATH>/<BOT_LANG>.toml`. Lookups fall back to the caller's default text,
//! so a missing or unreadable catalog only costs translations, never startup.

use crate::config::non_empty;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Default catalog directory when `LOCALE_PATH` is unset.
pub const DEFAULT_LOCALE_PATH: &str = "locales/";
/// Default language tag when `BOT_LANG` is unset.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Where to find the message catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSettings {
    /// Directory containing `<lang>.toml` files
    pub directory: PathBuf,
    /// Language tag of the catalog to load
    pub language: String,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOCALE_PATH),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl LocaleSettings {
    /// Reads `LOCALE_PATH` and `BOT_LANG` through `lookup`.
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            directory: non_empty(lookup, "LOCALE_PATH").map_or(defaults.directory, PathBuf::from),
            language: non_empty(lookup, "BOT_LANG").unwrap_or(defaults.language),
        }
    }
}

/// Translated messages for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleCatalog {
    language: String,
    messages: HashMap<String, String>,
}

impl LocaleCatalog {
    /// Loads the catalog named by `settings`.
    ///
    /// A missing or malformed file yields an empty catalog and a warning.
    #[must_use]
    pub fn load(settings: &LocaleSettings) -> Self {
        let path = settings.directory.join(format!("{}.toml", settings.language));
        debug!("Attempting to load locale catalog from: {:?}", path);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Locale catalog {:?} unavailable ({}); using default messages", path, e);
                return Self::empty(&settings.language);
            }
        };

        match Self::from_toml_str(&settings.language, &contents) {
            Ok(catalog) => {
                info!(
                    language = %settings.language,
                    messages = catalog.len(),
                    "Loaded locale catalog"
                );
                catalog
            }
            Err(e) => {
                warn!("Failed to parse locale catalog {:?}: {}; using default messages", path, e);
                Self::empty(&settings.language)
            }
        }
    }

    /// Parses a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the text is not a flat string table.
    pub fn from_toml_str(
        language: &str,
        contents: &str,
    ) -> std::result::Result<Self, toml::de::Error> {
        let messages: HashMap<String, String> = toml::from_str(contents)?;
        Ok(Self {
            language: language.to_string(),
            messages,
        })
    }

    fn empty(language: &str) -> Self {
        Self {
            language: language.to_string(),
            messages: HashMap::new(),
        }
    }

    /// Language tag of this catalog.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Number of translated messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the catalog holds no translations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the translation for `id`, or `default` when there is none.
    #[must_use]
    pub fn localize<'a>(&'a self, id: &str, default: &'a str) -> &'a str {
        self.messages.get(id).map_or(default, String::as_str)
    }
}
