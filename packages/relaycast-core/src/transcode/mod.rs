//! Per-track transcode pipelines.
//!
//! A [`Transcoder`] turns a source file into a [`Pipeline`]: a running
//! subordinate process plus its encoded output stream. The supervisor drains
//! the output into the broadcast session and then waits for the typed
//! [`PipelineOutcome`] before starting the next track.

pub mod ffmpeg;

use std::path::Path;
use std::process::ExitStatus;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::io::AsyncRead;

pub use ffmpeg::FfmpegTranscoder;

/// Errors that prevent a pipeline from running or being observed.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The transcoder process could not be started.
    #[error("failed to spawn {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The process was started without a readable stdout.
    #[error("{0} has no stdout pipe")]
    MissingOutput(String),

    /// Waiting on the process failed.
    #[error("failed waiting for {tool}: {source}")]
    Wait {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenient Result alias for transcode operations.
pub type TranscodeResult<T> = Result<T, TranscodeError>;

/// How a pipeline process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum PipelineOutcome {
    /// Exit status zero.
    Success,
    /// Non-zero exit code.
    ProcessError(i32),
    /// Terminated by a signal (the number, where the platform reports one).
    KilledBySignal(Option<i32>),
}

impl PipelineOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Classifies a process exit status.
    #[must_use]
    pub fn from_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(0) => Self::Success,
            Some(code) => Self::ProcessError(code),
            None => Self::KilledBySignal(signal_of(status)),
        }
    }
}

impl std::fmt::Display for PipelineOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::ProcessError(code) => write!(f, "exit code {}", code),
            Self::KilledBySignal(Some(sig)) => write!(f, "killed by signal {}", sig),
            Self::KilledBySignal(None) => f.write_str("killed by signal"),
        }
    }
}

#[cfg(unix)]
fn signal_of(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn signal_of(_status: ExitStatus) -> Option<i32> {
    None
}

/// Encoded audio produced by a pipeline.
pub type PipelineOutput = Box<dyn AsyncRead + Send + Unpin>;

/// Handle on the process behind a pipeline.
#[async_trait]
pub trait PipelineProcess: Send {
    /// Waits for the process to exit.
    async fn wait(&mut self) -> TranscodeResult<PipelineOutcome>;

    /// Terminates the process and reaps it. Best-effort.
    async fn kill(&mut self);
}

/// A running transcode: its output stream and its process handle.
pub struct Pipeline {
    pub output: PipelineOutput,
    pub process: Box<dyn PipelineProcess>,
}

impl Pipeline {
    pub fn new(output: PipelineOutput, process: Box<dyn PipelineProcess>) -> Self {
        Self { output, process }
    }
}

/// Starts transcode pipelines for source files.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Spawns a pipeline that encodes `source` into the streaming format.
    async fn start(&self, source: &Path) -> TranscodeResult<Pipeline>;
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    #[test]
    fn outcome_from_exit_status() {
        assert_eq!(
            PipelineOutcome::from_status(ExitStatus::from_raw(0)),
            PipelineOutcome::Success
        );
        // Exit code lives in the high byte of the raw wait status.
        assert_eq!(
            PipelineOutcome::from_status(ExitStatus::from_raw(1 << 8)),
            PipelineOutcome::ProcessError(1)
        );
        assert_eq!(
            PipelineOutcome::from_status(ExitStatus::from_raw(9)),
            PipelineOutcome::KilledBySignal(Some(9))
        );
    }

    #[test]
    fn outcome_display() {
        assert_eq!(PipelineOutcome::ProcessError(69).to_string(), "exit code 69");
        assert_eq!(
            PipelineOutcome::KilledBySignal(Some(15)).to_string(),
            "killed by signal 15"
        );
    }
}
