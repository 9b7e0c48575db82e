//! ffmpeg-backed transcoder.
//!
//! Each track runs `ffmpeg -re -i <file> -f mp3 -c:a mp3 -b:a <N>k -`. The
//! `-re` flag paces reading at real time, so the output arrives at roughly
//! the rate listeners consume it and the server never needs to buffer ahead.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::{Child, Command};

use super::{
    Pipeline, PipelineOutcome, PipelineProcess, TranscodeError, TranscodeResult, Transcoder,
};
use crate::protocol_constants::{DEFAULT_BITRATE_KBPS, TRANSCODE_CODEC, TRANSCODE_FORMAT};

/// Spawns one ffmpeg process per track.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    ffmpeg_path: PathBuf,
    bitrate_kbps: u32,
}

impl FfmpegTranscoder {
    /// Creates a transcoder using the given ffmpeg binary and the default bitrate.
    pub fn new(ffmpeg_path: PathBuf) -> Self {
        Self {
            ffmpeg_path,
            bitrate_kbps: DEFAULT_BITRATE_KBPS,
        }
    }

    /// Creates a transcoder that finds ffmpeg on `PATH`.
    pub fn from_path() -> Option<Self> {
        which::which("ffmpeg").ok().map(Self::new)
    }

    /// Sets the constant output bitrate.
    #[must_use]
    pub fn with_bitrate(mut self, bitrate_kbps: u32) -> Self {
        self.bitrate_kbps = bitrate_kbps;
        self
    }

    /// Arguments for transcoding `source` to stdout.
    #[must_use]
    pub fn args_for(&self, source: &Path) -> Vec<OsString> {
        vec![
            "-re".into(),
            "-i".into(),
            source.as_os_str().to_owned(),
            "-f".into(),
            TRANSCODE_FORMAT.into(),
            "-c:a".into(),
            TRANSCODE_CODEC.into(),
            "-b:a".into(),
            format!("{}k", self.bitrate_kbps).into(),
            "-".into(),
        ]
    }

    fn tool_name(&self) -> String {
        self.ffmpeg_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.ffmpeg_path.to_string_lossy().into_owned())
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn start(&self, source: &Path) -> TranscodeResult<Pipeline> {
        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.args(self.args_for(source));

        log::info!(
            "[Transcode] {} {}",
            self.ffmpeg_path.display(),
            self.args_for(source)
                .iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        spawn_pipeline(cmd, self.tool_name())
    }
}

/// Spawns `cmd` with stdout piped and wraps it as a [`Pipeline`].
///
/// stdin and stderr are detached. The child is killed if the pipeline is
/// dropped before it exits.
pub(crate) fn spawn_pipeline(mut cmd: Command, tool: String) -> TranscodeResult<Pipeline> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| TranscodeError::Spawn {
        tool: tool.clone(),
        source,
    })?;

    let Some(stdout) = child.stdout.take() else {
        return Err(TranscodeError::MissingOutput(tool));
    };

    Ok(Pipeline::new(
        Box::new(stdout),
        Box::new(ChildProcess { child, tool }),
    ))
}

/// [`PipelineProcess`] over a tokio child process.
struct ChildProcess {
    child: Child,
    tool: String,
}

#[async_trait]
impl PipelineProcess for ChildProcess {
    async fn wait(&mut self) -> TranscodeResult<PipelineOutcome> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|source| TranscodeError::Wait {
                tool: self.tool.clone(),
                source,
            })?;
        Ok(PipelineOutcome::from_status(status))
    }

    async fn kill(&mut self) {
        if let Err(e) = self.child.kill().await {
            log::warn!("[Transcode] Failed to kill {}: {}", self.tool, e);
        }
    }
}
