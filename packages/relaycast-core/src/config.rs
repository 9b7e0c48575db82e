//! Run configuration.
//!
//! [`Config`] groups everything a broadcast run needs. All fields have
//! defaults; [`Config::validate`] rejects values that would fail at runtime.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::icecast::{Credentials, SessionConfig, SourceEndpoint, StreamDescriptor};
use crate::protocol_constants::{
    DEFAULT_BITRATE_KBPS, DEFAULT_GENRE, DEFAULT_HISTORY_CAPACITY, DEFAULT_MOUNT,
    DEFAULT_USER_AGENT,
};

/// Media library selection and playback order.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directory whose immediate entries form the queue.
    pub directory: PathBuf,

    /// Restart from the first entry after the last one.
    #[serde(rename = "loop")]
    pub looping: bool,

    /// Shuffle the queue once before streaming starts.
    pub shuffle: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("music"),
            looping: false,
            shuffle: false,
        }
    }
}

/// Broadcast server connection and stream description.
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct IcecastConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub mount: String,
    pub genre: String,
    /// Advertised as `Ice-Public: 1` when true.
    pub public: bool,
    pub user_agent: String,

    /// Push the current track title through the admin interface.
    pub update_metadata: bool,
}

impl Default for IcecastConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8000,
            username: "source".to_string(),
            password: "hackme".to_string(),
            mount: DEFAULT_MOUNT.to_string(),
            genre: DEFAULT_GENRE.to_string(),
            public: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            update_metadata: false,
        }
    }
}

impl fmt::Debug for IcecastConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IcecastConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("mount", &self.mount)
            .field("genre", &self.genre)
            .field("public", &self.public)
            .field("user_agent", &self.user_agent)
            .field("update_metadata", &self.update_metadata)
            .finish()
    }
}

impl IcecastConfig {
    pub fn endpoint(&self) -> SourceEndpoint {
        SourceEndpoint::new(self.host.clone(), self.port)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }

    pub fn descriptor(&self) -> StreamDescriptor {
        StreamDescriptor {
            mount: self.mount.clone(),
            genre: self.genre.clone(),
            public: self.public,
            user_agent: self.user_agent.clone(),
        }
    }

    /// Everything the session needs to dial and authenticate.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            endpoint: self.endpoint(),
            credentials: self.credentials(),
            descriptor: self.descriptor(),
        }
    }
}

/// Transcoder selection and output format.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranscodeConfig {
    /// ffmpeg binary; looked up on `PATH` when unset.
    pub ffmpeg_path: Option<PathBuf>,
    pub bitrate_kbps: u32,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            bitrate_kbps: DEFAULT_BITRATE_KBPS,
        }
    }
}

/// Metadata reader selection.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ProbeConfig {
    /// mediainfo binary; looked up on `PATH` when unset.
    pub mediainfo_path: Option<PathBuf>,
}

/// What to do when the connection drops mid-stream.
///
/// With `max_attempts == 0` (the default) a lost connection ends the run.
/// Otherwise the supervisor re-dials up to `max_attempts` times, waiting
/// `backoff_ms[n]` before attempt `n + 1`; the last delay repeats.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub backoff_ms: Vec<u64>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            backoff_ms: vec![500, 2000, 5000],
        }
    }
}

impl ReconnectPolicy {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.max_attempts > 0
    }

    /// Delay before the 1-based `attempt`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let index = (attempt.saturating_sub(1) as usize)
            .min(self.backoff_ms.len().saturating_sub(1));
        Duration::from_millis(self.backoff_ms.get(index).copied().unwrap_or(0))
    }
}

/// Configuration for a broadcast run.
///
/// All fields have sensible defaults.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub library: LibraryConfig,
    pub icecast: IcecastConfig,
    pub transcode: TranscodeConfig,
    pub probe: ProbeConfig,
    pub reconnect: ReconnectPolicy,

    /// Number of playback records kept for the run summary.
    pub history_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library: LibraryConfig::default(),
            icecast: IcecastConfig::default(),
            transcode: TranscodeConfig::default(),
            probe: ProbeConfig::default(),
            reconnect: ReconnectPolicy::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl Config {
    /// Validates the configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.icecast.host.trim().is_empty() {
            return Err("icecast.host must not be empty".to_string());
        }
        if self.icecast.port == 0 {
            return Err("icecast.port must be >= 1".to_string());
        }
        if self.icecast.username.is_empty() {
            return Err("icecast.username must not be empty".to_string());
        }
        if !self.icecast.mount.starts_with('/') {
            return Err(format!(
                "icecast.mount must start with '/' (got {:?})",
                self.icecast.mount
            ));
        }
        if self.transcode.bitrate_kbps == 0 {
            return Err("transcode.bitrate_kbps must be >= 1".to_string());
        }
        if self.reconnect.is_enabled() && self.reconnect.backoff_ms.is_empty() {
            return Err(
                "reconnect.backoff_ms must not be empty when reconnects are enabled".to_string(),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(!config.reconnect.is_enabled());
        assert_eq!(config.icecast.mount, "/stream.mp3");
        assert_eq!(config.transcode.bitrate_kbps, 128);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = Config::default();
        config.icecast.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.icecast.mount = "stream.mp3".into();
        assert!(config.validate().unwrap_err().contains("mount"));

        let mut config = Config::default();
        config.icecast.username.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.transcode.bitrate_kbps = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.reconnect = ReconnectPolicy {
            max_attempts: 3,
            backoff_ms: vec![],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn backoff_repeats_last_delay() {
        let policy = ReconnectPolicy {
            max_attempts: 5,
            backoff_ms: vec![100, 400],
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for(5), Duration::from_millis(400));
    }

    #[test]
    fn session_config_carries_descriptor() {
        let mut icecast = IcecastConfig::default();
        icecast.mount = "/live.mp3".into();
        icecast.public = false;

        let session = icecast.session_config();
        assert_eq!(session.endpoint.to_string(), "localhost:8000");
        assert_eq!(session.descriptor.mount, "/live.mp3");
        assert!(!session.descriptor.public);
    }

    #[test]
    fn debug_redacts_password() {
        let mut icecast = IcecastConfig::default();
        icecast.password = "topsecret".into();
        let rendered = format!("{:?}", icecast);
        assert!(!rendered.contains("topsecret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn deserializes_loop_keyword() {
        let config: Config = serde_json::from_str(
            r#"{"library": {"directory": "/srv/music", "loop": true}, "icecast": {"port": 8010}}"#,
        )
        .unwrap();
        assert!(config.library.looping);
        assert!(!config.library.shuffle);
        assert_eq!(config.icecast.port, 8010);
        assert_eq!(config.icecast.host, "localhost");
    }
}
