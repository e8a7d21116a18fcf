//! Application settings persisted as TOML.
//!
//! One flat `Settings.toml` with kebab-case keys:
//!
//! ```toml
//! [logging]
//! enabled = true
//! level = "info"
//! max-files = 3
//! directory = "logs"
//! ```
//!
//! Loading is resilient: a missing or unreadable file degrades to defaults
//! with a diagnostic on stderr, never an error to the caller. Saving is
//! fallible and reports context through `anyhow`.

use anyhow::{format_err, Context, Error};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SETTINGS_PATH: &str = "Settings.toml";

/// Top-level settings tree.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "kebab-case")]
pub struct Settings {
    pub logging: LoggingSettings,
}

/// Settings for the logging system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingSettings {
    /// Whether logging is initialized at all.
    pub enabled: bool,
    /// Default level filter; overridden by `RUST_LOG` when set.
    pub level: String,
    /// How many run log files to retain (0 keeps all).
    pub max_files: usize,
    /// Log directory, relative to the working directory.
    pub directory: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            enabled: true,
            level: "info".to_string(),
            max_files: 3,
            directory: PathBuf::from("logs"),
        }
    }
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults when the file is
    /// missing or malformed.
    ///
    /// Diagnostics go to stderr rather than `tracing` because settings are
    /// loaded before the logging system is configured; tracing emitted here
    /// would be silently dropped.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Settings {
        match load_toml::<Settings, _>(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                if path.as_ref().exists() {
                    eprintln!(
                        "failed to load {}: {:#}; using defaults",
                        path.as_ref().display(),
                        e
                    );
                }
                Settings::default()
            }
        }
    }
}

/// Reads and deserializes a TOML value from `path`.
pub fn load_toml<T, P>(path: P) -> Result<T, Error>
where
    T: for<'a> Deserialize<'a>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("can't read file {}", path.display()))?;
    toml::from_str(&contents)
        .map_err(|e| format_err!("can't parse TOML content from {}: {:#}", path.display(), e))
}

/// Serializes `data` as TOML and writes it to `path`.
pub fn save_toml<T, P>(data: &T, path: P) -> Result<(), Error>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let content = toml::to_string(data).context("can't convert to TOML format")?;
    let mut file =
        File::create(path).with_context(|| format!("can't create file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("can't write to file {}", path.display()))?;
    Ok(())
}
