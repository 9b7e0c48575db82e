//! Bounded record of what was played during a run.

use std::collections::VecDeque;
use std::path::PathBuf;

use serde::Serialize;

use crate::transcode::PipelineOutcome;

/// How a track's playback attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PlaybackResult {
    /// The pipeline ran to completion with the given outcome.
    Finished { outcome: PipelineOutcome },
    /// The pipeline could not be started or observed.
    Failed { reason: String },
    /// The connection dropped while the track was on air.
    Interrupted,
    /// The run was cancelled while the track was on air.
    Cancelled,
}

/// One playback attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackRecord {
    pub path: PathBuf,
    pub title: String,
    /// Unix timestamp in milliseconds.
    pub started_at: u64,
    /// Encoded bytes sent before the attempt ended.
    pub bytes: u64,
    pub result: PlaybackResult,
}

/// Most recent playback records, oldest evicted first.
#[derive(Debug, Clone)]
pub struct PlaybackHistory {
    records: VecDeque<PlaybackRecord>,
    capacity: usize,
}

impl PlaybackHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn push(&mut self, record: PlaybackRecord) {
        if self.capacity == 0 {
            return;
        }
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlaybackRecord> {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> PlaybackRecord {
        PlaybackRecord {
            path: PathBuf::from(name),
            title: name.to_string(),
            started_at: 0,
            bytes: 0,
            result: PlaybackResult::Finished {
                outcome: PipelineOutcome::Success,
            },
        }
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut history = PlaybackHistory::new(2);
        history.push(record("a"));
        history.push(record("b"));
        history.push(record("c"));

        let titles: Vec<_> = history.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c"]);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut history = PlaybackHistory::new(0);
        history.push(record("a"));
        assert!(history.is_empty());
    }
}
