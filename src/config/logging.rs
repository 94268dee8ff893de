//! Log sink configuration.
//!
//! Events always go to stdout. Unless `DISABLE_LOG_FILE` is set, they are also
//! written (without ANSI colours) to `logs.txt` inside `LOG_PATH`. The resulting
//! [`LogSink`] is kept in the application context so the rest of the process knows
//! where its logs end up.

use crate::config::non_empty;
use crate::errors::{Error, Result};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// File name created inside the log directory.
pub const LOG_FILE_NAME: &str = "logs.txt";

/// Where log output should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Directory holding the log file (`LOG_PATH`, default `./`)
    pub directory: PathBuf,
    /// Whether the log file is written at all
    pub file_enabled: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./"),
            file_enabled: true,
        }
    }
}

impl LoggingSettings {
    /// Reads `LOG_PATH` and `DISABLE_LOG_FILE` through `lookup`.
    pub fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            directory: non_empty(lookup, "LOG_PATH")
                .map_or_else(|| PathBuf::from("./"), PathBuf::from),
            file_enabled: non_empty(lookup, "DISABLE_LOG_FILE").is_none(),
        }
    }

    /// Full path of the log file, if file logging is enabled.
    #[must_use]
    pub fn file_path(&self) -> Option<PathBuf> {
        self.file_enabled.then(|| self.directory.join(LOG_FILE_NAME))
    }
}

/// The installed log destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSink {
    file: Option<PathBuf>,
}

impl LogSink {
    /// Path of the log file, or `None` when logging to stdout only.
    #[must_use]
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

/// Installs the global subscriber described by `settings`.
///
/// The filter honours `RUST_LOG` and defaults to `info`.
///
/// # Errors
///
/// Returns an error if the log file cannot be created or a subscriber was
/// already installed.
pub fn init_tracing(settings: &LoggingSettings) -> Result<LogSink> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_path = settings.file_path();
    let file_layer = match &file_path {
        Some(path) => {
            let file = File::create(path)?;
            Some(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    Ok(LogSink { file: file_path })
}
