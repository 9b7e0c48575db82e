//! Centralized error types for the relaycast core library.
//!
//! Each subsystem defines its own `thiserror` enum and `*Result` alias.
//! [`RelaycastError`] aggregates the failures that end a run and maps each
//! one to a process exit status.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::icecast::{AdminError, SessionError};
use crate::library::{LibraryError, ProbeError};
use crate::transcode::TranscodeError;

/// Process exit statuses reported by the source client binary.
pub mod exit_status {
    pub const OK: u8 = 0;
    pub const DIRECTORY_UNREADABLE: u8 = 1;
    pub const DIAL_FAILED: u8 = 2;
    pub const HANDSHAKE_REJECTED: u8 = 3;
    pub const NO_PLAYABLE_TRACKS: u8 = 4;
    pub const CONNECTION_LOST: u8 = 5;
    pub const CONFIGURATION: u8 = 6;
    pub const UNCLEAN_SHUTDOWN: u8 = 7;
}

/// Trait for error types that provide machine-readable error codes.
pub trait ErrorCode {
    /// Returns a machine-readable error code for logs and events.
    fn code(&self) -> &'static str;
}

impl ErrorCode for SessionError {
    fn code(&self) -> &'static str {
        match self {
            Self::Dial { .. } => "dial_failed",
            Self::HandshakeRejected { .. } => "handshake_rejected",
            Self::HandshakeIo(_) => "handshake_io_error",
            Self::HandshakeTimeout(_) => "handshake_timeout",
            Self::NotReady => "session_not_ready",
            Self::Connection(_) => "connection_lost",
        }
    }
}

impl ErrorCode for ProbeError {
    fn code(&self) -> &'static str {
        match self {
            Self::Spawn { .. } => "probe_spawn_failed",
            Self::Failed { .. } => "probe_failed",
            Self::Timeout(_) => "probe_timeout",
            Self::Parse(_) => "probe_parse_error",
            Self::NoAudioStream(_) => "no_audio_stream",
        }
    }
}

impl ErrorCode for TranscodeError {
    fn code(&self) -> &'static str {
        match self {
            Self::Spawn { .. } => "transcode_spawn_failed",
            Self::MissingOutput(_) => "transcode_missing_output",
            Self::Wait { .. } => "transcode_wait_failed",
        }
    }
}

impl ErrorCode for AdminError {
    fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "http_request_failed",
            Self::HttpStatus(_) => "http_error_status",
            Self::InvalidUrl(_) => "invalid_admin_url",
        }
    }
}

/// Errors that end a broadcast run.
#[derive(Debug, Error)]
pub enum RelaycastError {
    /// The media directory could not be listed.
    #[error(transparent)]
    Library(#[from] LibraryError),

    /// The session could not be established.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A full looping pass completed without streaming a single track.
    #[error("No playable tracks in {}", .0.display())]
    NoPlayableTracks(PathBuf),

    /// The connection dropped mid-stream and could not be re-established.
    #[error("Connection lost after {attempts} reconnect attempt(s): {source}")]
    ConnectionLost {
        attempts: u32,
        #[source]
        source: SessionError,
    },

    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The run did not wind down within the shutdown grace period and was
    /// aborted without ending the stream.
    #[error("Run did not stop within {0:?} of the shutdown signal; stream abandoned")]
    ShutdownTimeout(Duration),
}

impl ErrorCode for RelaycastError {
    fn code(&self) -> &'static str {
        match self {
            Self::Library(_) => "directory_unreadable",
            Self::Session(e) => e.code(),
            Self::NoPlayableTracks(_) => "no_playable_tracks",
            Self::ConnectionLost { .. } => "connection_lost",
            Self::Configuration(_) => "configuration_error",
            Self::ShutdownTimeout(_) => "unclean_shutdown",
        }
    }
}

impl RelaycastError {
    /// Maps the error to the process exit status.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Library(_) => exit_status::DIRECTORY_UNREADABLE,
            Self::Session(SessionError::Dial { .. }) => exit_status::DIAL_FAILED,
            Self::Session(
                SessionError::HandshakeRejected { .. }
                | SessionError::HandshakeIo(_)
                | SessionError::HandshakeTimeout(_),
            ) => exit_status::HANDSHAKE_REJECTED,
            Self::Session(SessionError::NotReady | SessionError::Connection(_))
            | Self::ConnectionLost { .. } => exit_status::CONNECTION_LOST,
            Self::NoPlayableTracks(_) => exit_status::NO_PLAYABLE_TRACKS,
            Self::Configuration(_) => exit_status::CONFIGURATION,
            Self::ShutdownTimeout(_) => exit_status::UNCLEAN_SHUTDOWN,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Result Type Aliases
// ─────────────────────────────────────────────────────────────────────────────

pub use crate::icecast::{AdminResult, SessionResult};
pub use crate::library::{LibraryResult, ProbeResult};
pub use crate::transcode::TranscodeResult;

/// Convenient Result alias for run-level operations.
pub type RelaycastResult<T> = Result<T, RelaycastError>;
