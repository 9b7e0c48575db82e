//! Track and audio quality types produced by the metadata probe.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Channel layout of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelMode {
    Mono,
    Stereo,
}

impl ChannelMode {
    /// Maps a channel count to a mode. Only exactly two channels is stereo.
    #[must_use]
    pub fn from_channel_count(channels: u32) -> Self {
        if channels == 2 {
            Self::Stereo
        } else {
            Self::Mono
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mono => f.write_str("mono"),
            Self::Stereo => f.write_str("stereo"),
        }
    }
}

/// Original encoding quality of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioQuality {
    /// Bitrate in kbps.
    pub bitrate_kbps: u32,
    /// Sample rate in Hz.
    pub sample_rate_hz: u32,
    pub channel_mode: ChannelMode,
    /// Container/format extension (e.g. `flac`, `mp3`).
    pub format: String,
}

/// A successfully probed, playable file.
///
/// Read-only once created; dropped when its playback ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    pub file_name: String,
    pub path: PathBuf,
    pub duration_secs: u64,
    pub quality: AudioQuality,
}

impl Track {
    /// Builds a track, deriving the file name from the last path component.
    pub fn new(path: impl Into<PathBuf>, duration_secs: u64, quality: AudioQuality) -> Self {
        let path = path.into();
        Self {
            file_name: file_name_of(&path),
            path,
            duration_secs,
            quality,
        }
    }

    /// Whole minutes of playback, rounded down.
    #[must_use]
    pub fn duration_minutes(&self) -> u64 {
        self.duration_secs / 60
    }

    /// Title pushed to the server as now-playing: the file stem.
    #[must_use]
    pub fn display_title(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_name.clone())
    }
}

/// Last path component as a lossy string, or the whole path if it has none.
pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
