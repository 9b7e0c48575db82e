//! Source directory scanning.
//!
//! The directory is listed once at startup. Every entry is kept together with
//! its kind so the supervisor can skip anything that is not a regular file.

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::Rng;

use super::track::file_name_of;
use super::{LibraryError, LibraryResult};

/// What a directory entry turned out to be when it was scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Anything whose metadata could not be read (broken symlink, permissions).
    Unreadable,
}

/// A single candidate in the playback queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl QueueEntry {
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }
}

/// Ordered list of candidates built from the source directory.
///
/// Never mutated after construction apart from the one-off shuffle.
#[derive(Debug, Clone, Default)]
pub struct PlaybackQueue {
    entries: Vec<QueueEntry>,
}

impl PlaybackQueue {
    #[must_use]
    pub fn new(entries: Vec<QueueEntry>) -> Self {
        Self { entries }
    }

    /// Builds a queue of regular files from a list of paths.
    #[must_use]
    pub fn from_files<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::new(
            paths
                .into_iter()
                .map(|p| QueueEntry {
                    path: p.into(),
                    kind: EntryKind::File,
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries that are regular files.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_file()).count()
    }

    /// Shuffles the queue order using the thread-local RNG.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::thread_rng());
    }

    /// Shuffles the queue order with the given RNG.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.entries.shuffle(rng);
    }
}

/// Lists `dir` and returns its entries sorted by file name.
///
/// Directories and unreadable entries are kept (marked by [`EntryKind`]) so
/// the queue mirrors the directory listing.
///
/// # Errors
///
/// Returns [`LibraryError::DirectoryUnreadable`] if the directory itself
/// cannot be opened or iterated.
pub async fn scan_directory(dir: &Path) -> LibraryResult<PlaybackQueue> {
    let unreadable = |source| LibraryError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut read_dir = tokio::fs::read_dir(dir).await.map_err(unreadable)?;
    let mut entries = Vec::new();

    while let Some(entry) = read_dir.next_entry().await.map_err(unreadable)? {
        let path = entry.path();
        // Follows symlinks so a link to a file counts as a file.
        let kind = match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => EntryKind::Directory,
            Ok(meta) if meta.is_file() => EntryKind::File,
            Ok(_) => EntryKind::Unreadable,
            Err(e) => {
                log::debug!("[Library] Cannot stat {}: {}", path.display(), e);
                EntryKind::Unreadable
            }
        };
        entries.push(QueueEntry { path, kind });
    }

    entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

    log::info!(
        "[Library] Scanned {}: {} entries, {} files",
        dir.display(),
        entries.len(),
        entries.iter().filter(|e| e.is_file()).count()
    );

    Ok(PlaybackQueue::new(entries))
}
