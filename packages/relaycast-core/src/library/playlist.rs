//! Cursor over the playback queue.

use super::scan::{PlaybackQueue, QueueEntry};

/// Walks the [`PlaybackQueue`] one pass at a time.
///
/// [`Playlist::next_entry`] returns `None` at the end of every pass. The caller
/// decides whether to [`rewind`](Playlist::rewind) (looping) or stop.
#[derive(Debug, Clone)]
pub struct Playlist {
    queue: PlaybackQueue,
    looping: bool,
    position: usize,
    pass: u64,
}

impl Playlist {
    #[must_use]
    pub fn new(queue: PlaybackQueue, looping: bool) -> Self {
        Self {
            queue,
            looping,
            position: 0,
            pass: 0,
        }
    }

    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    #[must_use]
    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    /// Zero-based index of the current pass.
    #[must_use]
    pub fn pass(&self) -> u64 {
        self.pass
    }

    /// Index of the entry the next call to `next_entry` returns.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the next candidate of the current pass, or `None` when the pass is over.
    pub fn next_entry(&mut self) -> Option<QueueEntry> {
        let entry = self.queue.entries().get(self.position)?.clone();
        self.position += 1;
        Some(entry)
    }

    /// Moves the cursor back to the first entry and starts a new pass.
    pub fn rewind(&mut self) {
        self.position = 0;
        self.pass += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(playlist: &mut Playlist) -> Vec<String> {
        std::iter::from_fn(|| playlist.next_entry())
            .map(|e| e.file_name())
            .collect()
    }

    #[test]
    fn pass_ends_with_none() {
        let mut playlist = Playlist::new(PlaybackQueue::from_files(["/m/1.mp3", "/m/2.mp3"]), false);
        assert_eq!(names(&mut playlist), vec!["1.mp3", "2.mp3"]);
        assert!(playlist.next_entry().is_none());
    }

    #[test]
    fn rewind_starts_over_from_first_entry() {
        let mut playlist = Playlist::new(
            PlaybackQueue::from_files(["/m/1.mp3", "/m/2.mp3", "/m/3.mp3"]),
            true,
        );
        assert_eq!(names(&mut playlist).len(), 3);

        playlist.rewind();
        assert_eq!(playlist.pass(), 1);
        assert_eq!(playlist.next_entry().unwrap().file_name(), "1.mp3");
    }

    #[test]
    fn empty_queue_has_no_entries() {
        let mut playlist = Playlist::new(PlaybackQueue::default(), true);
        assert!(playlist.next_entry().is_none());
    }
}
