//! Source client configuration.
//!
//! Supports loading from YAML files with environment variable overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Source client configuration loaded from YAML with environment overrides.
///
/// The run settings (`library`, `icecast`, `transcode`, `probe`, `reconnect`,
/// `history_capacity`) are read straight into the core [`relaycast_core::Config`].
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    #[serde(flatten)]
    pub run: relaycast_core::Config,

    /// Seconds to wait for the current track to wind down after a shutdown
    /// signal before the run is aborted.
    pub shutdown_grace_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            run: relaycast_core::Config::default(),
            shutdown_grace_secs: 5,
        }
    }
}

impl SourceConfig {
    /// Loads configuration from a YAML file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_yaml(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Applies environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from `lookup`; unparseable values are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let run = &mut self.run;

        if let Some(val) = lookup("RELAYCAST_LOOP") {
            if let Some(looping) = parse_bool(&val) {
                run.library.looping = looping;
            }
        }

        if let Some(val) = lookup("RELAYCAST_SHUFFLE") {
            if let Some(shuffle) = parse_bool(&val) {
                run.library.shuffle = shuffle;
            }
        }

        if let Some(val) = lookup("RELAYCAST_ICECAST_USER") {
            run.icecast.username = val;
        }

        if let Some(val) = lookup("RELAYCAST_ICECAST_PASSWORD") {
            run.icecast.password = val;
        }

        if let Some(val) = lookup("RELAYCAST_RECONNECT_ATTEMPTS") {
            if let Ok(attempts) = val.parse() {
                run.reconnect.max_attempts = attempts;
            }
        }

        // Note: RELAYCAST_LIBRARY_DIR, RELAYCAST_ICECAST_HOST and
        // RELAYCAST_ICECAST_PORT are handled by clap via #[arg(env = ...)] in main.rs
    }

    /// Sets the media directory.
    pub fn set_directory(&mut self, directory: PathBuf) {
        self.run.library.directory = directory;
    }

    /// Converts to relaycast-core's Config type.
    pub fn to_core_config(&self) -> relaycast_core::Config {
        self.run.clone()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
