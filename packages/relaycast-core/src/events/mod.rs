//! Supervisor lifecycle events.
//!
//! This module provides:
//! - [`EventEmitter`] trait for the supervisor to report progress
//! - [`SupervisorEvent`], the single event category emitted during a run

mod emitter;

pub use emitter::{EventEmitter, LoggingEventEmitter, NoopEventEmitter};

use std::path::PathBuf;

use serde::Serialize;

use crate::supervisor::SupervisorState;
use crate::transcode::PipelineOutcome;

/// Events describing the progress of a broadcast run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SupervisorEvent {
    /// The supervisor moved to a new lifecycle state.
    StateChanged {
        state: SupervisorState,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
    /// The server accepted the source handshake.
    HandshakeComplete {
        endpoint: String,
        timestamp: u64,
    },
    /// A track's pipeline started and its audio is being streamed.
    TrackStarted {
        path: PathBuf,
        title: String,
        #[serde(rename = "durationSecs")]
        duration_secs: u64,
        timestamp: u64,
    },
    /// A track's pipeline ran to completion.
    TrackFinished {
        path: PathBuf,
        outcome: PipelineOutcome,
        /// Encoded bytes sent for this track.
        bytes: u64,
        timestamp: u64,
    },
    /// A queue entry was passed over without streaming.
    TrackSkipped {
        path: PathBuf,
        reason: String,
        timestamp: u64,
    },
    /// The connection dropped and a new session is about to be dialed.
    Reconnecting {
        attempt: u32,
        #[serde(rename = "delayMs")]
        delay_ms: u64,
        timestamp: u64,
    },
    /// A replacement session completed its handshake.
    Reconnected {
        attempt: u32,
        timestamp: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = SupervisorEvent::TrackFinished {
            path: PathBuf::from("/music/a.mp3"),
            outcome: PipelineOutcome::ProcessError(1),
            bytes: 42,
            timestamp: 7,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "trackFinished");
        assert_eq!(json["outcome"]["kind"], "processError");
        assert_eq!(json["outcome"]["value"], 1);
        assert_eq!(json["bytes"], 42);
    }

    #[test]
    fn state_changed_uses_uppercase_state() {
        let event = SupervisorEvent::StateChanged {
            state: SupervisorState::Streaming,
            timestamp: 0,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["state"], "STREAMING");
    }
}
