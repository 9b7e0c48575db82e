//! Audio metadata probing.
//!
//! [`MetadataReader`] is the seam the supervisor depends on. The production
//! implementation shells out to `mediainfo --Output=JSON <file>` and maps the
//! first audio track into a [`Track`].

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::process::Command;

use super::track::{AudioQuality, ChannelMode, Track};

/// Maximum time a single probe may take.
const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while probing a file.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The probe tool could not be started.
    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The probe tool exited unsuccessfully.
    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// The probe did not finish in time.
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),

    /// The tool output could not be parsed.
    #[error("cannot parse probe output: {0}")]
    Parse(String),

    /// The file has no audio stream.
    #[error("no audio stream in {}", .0.display())]
    NoAudioStream(PathBuf),
}

/// Convenient Result alias for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Reads audio metadata for a file.
///
/// Failures are per-track and recoverable: the supervisor logs them and moves
/// on to the next candidate.
#[async_trait]
pub trait MetadataReader: Send + Sync {
    /// Probes `path` and returns the playable track description.
    async fn probe(&self, path: &Path) -> ProbeResult<Track>;
}

/// A [`MetadataReader`] backed by the `mediainfo` CLI.
#[derive(Debug, Clone)]
pub struct MediaInfoReader {
    mediainfo_path: PathBuf,
}

impl MediaInfoReader {
    /// Creates a reader using the given mediainfo binary.
    pub fn new(mediainfo_path: PathBuf) -> Self {
        Self { mediainfo_path }
    }

    /// Creates a reader that finds mediainfo on `PATH`.
    pub fn from_path() -> Option<Self> {
        which::which("mediainfo").ok().map(Self::new)
    }

    fn tool_name(&self) -> String {
        self.mediainfo_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.mediainfo_path.to_string_lossy().into_owned())
    }
}

#[async_trait]
impl MetadataReader for MediaInfoReader {
    async fn probe(&self, path: &Path) -> ProbeResult<Track> {
        let tool = self.tool_name();
        log::debug!("[Probe] {} --Output=JSON {}", tool, path.display());

        let child = Command::new(&self.mediainfo_path)
            .arg("--Output=JSON")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProbeError::Spawn {
                tool: tool.clone(),
                source,
            })?;

        let output = tokio::time::timeout(PROBE_TIMEOUT, child.wait_with_output())
            .await
            .map_err(|_| ProbeError::Timeout(PROBE_TIMEOUT))?
            .map_err(|source| ProbeError::Spawn {
                tool: tool.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                tool,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_mediainfo_json(path, &output.stdout)
    }
}

// ---------------------------------------------------------------------------
// JSON structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct MiOutput {
    media: Option<MiMedia>,
}

#[derive(Debug, Deserialize)]
struct MiMedia {
    #[serde(default)]
    track: Vec<MiTrack>,
}

#[derive(Debug, Deserialize)]
struct MiTrack {
    #[serde(rename = "@type")]
    track_type: String,

    #[serde(rename = "FileExtension")]
    file_extension: Option<String>,

    #[serde(rename = "Format")]
    format: Option<String>,

    #[serde(rename = "BitRate")]
    bit_rate: Option<String>,

    #[serde(rename = "Duration")]
    duration: Option<String>,

    #[serde(rename = "Channels")]
    channels: Option<String>,

    #[serde(rename = "SamplingRate")]
    sampling_rate: Option<String>,
}

/// Parses a numeric mediainfo field, truncating any fractional part.
///
/// Unparseable or missing values read as zero: quality fields are advisory.
fn parse_number(value: Option<&str>) -> u64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v as u64)
        .unwrap_or(0)
}

/// Maps `mediainfo --Output=JSON` output into a [`Track`].
pub(crate) fn parse_mediainfo_json(path: &Path, json: &[u8]) -> ProbeResult<Track> {
    let output: MiOutput =
        serde_json::from_slice(json).map_err(|e| ProbeError::Parse(e.to_string()))?;
    let tracks = output.media.map(|m| m.track).unwrap_or_default();

    let general = tracks.iter().find(|t| t.track_type == "General");
    let audio = tracks
        .iter()
        .find(|t| t.track_type == "Audio")
        .ok_or_else(|| ProbeError::NoAudioStream(path.to_path_buf()))?;

    let format = general
        .and_then(|g| g.file_extension.clone())
        .or_else(|| {
            path.extension()
                .map(|e| e.to_string_lossy().to_ascii_lowercase())
        })
        .or_else(|| audio.format.as_ref().map(|f| f.to_ascii_lowercase()))
        .unwrap_or_default();

    let quality = AudioQuality {
        bitrate_kbps: (parse_number(audio.bit_rate.as_deref()) / 1000) as u32,
        sample_rate_hz: parse_number(audio.sampling_rate.as_deref()) as u32,
        channel_mode: ChannelMode::from_channel_count(parse_number(audio.channels.as_deref()) as u32),
        format,
    };

    // Mediainfo JSON reports durations in seconds.
    let duration_secs = parse_number(audio.duration.as_deref().or_else(|| {
        general.and_then(|g| g.duration.as_deref())
    }));

    Ok(Track::new(path, duration_secs, quality))
}
