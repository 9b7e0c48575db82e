//! Relaycast Core - Icecast source client library.
//!
//! This crate turns a directory of audio files into a continuous live stream
//! on an Icecast-compatible server. Each file is transcoded on the fly by an
//! external encoder and written to a single long-lived source connection.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`library`]: Directory scanning, playback queue and metadata probing
//! - [`icecast`]: Source handshake, chunked framing and the broadcast session
//! - [`transcode`]: Per-track encoder pipelines
//! - [`supervisor`]: The run state machine tying the above together
//! - [`events`]: Lifecycle events emitted during a run
//! - [`config`]: Run configuration
//! - [`error`]: Centralized error types
//!
//! # Abstraction Traits
//!
//! External effects sit behind traits so the supervisor can be exercised
//! without a network, ffmpeg or mediainfo:
//!
//! - [`Connector`](icecast::Connector): Opening the byte stream to the server
//! - [`MetadataReader`](library::MetadataReader): Probing a file for playability
//! - [`Transcoder`](transcode::Transcoder): Starting encoder pipelines
//! - [`NowPlaying`](icecast::NowPlaying): Publishing the current title
//! - [`EventEmitter`](events::EventEmitter): Observing the run
//!
//! Each trait has a default implementation suitable for the command-line client.

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod events;
pub mod icecast;
pub mod library;
pub mod protocol_constants;
pub mod supervisor;
pub mod transcode;
pub mod utils;

// Re-export commonly used types at the crate root
pub use config::{
    Config, IcecastConfig, LibraryConfig, ProbeConfig, ReconnectPolicy, TranscodeConfig,
};
pub use error::{exit_status, ErrorCode, RelaycastError, RelaycastResult};
pub use events::{EventEmitter, LoggingEventEmitter, NoopEventEmitter, SupervisorEvent};
pub use icecast::{
    BroadcastSession, Connector, Credentials, IcecastAdminClient, NowPlaying, SessionConfig,
    SessionError, SourceEndpoint, StreamDescriptor, TcpConnector,
};
pub use library::{MediaInfoReader, MetadataReader, Track};
pub use supervisor::{RunOutcome, RunSummary, Supervisor, SupervisorState};
pub use transcode::{FfmpegTranscoder, PipelineOutcome, Transcoder};
