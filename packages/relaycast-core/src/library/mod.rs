//! Media library access: directory scanning, playlist cursor and metadata probing.
//!
//! - [`scan`]: builds the [`PlaybackQueue`] from the source directory
//! - [`playlist`]: looping cursor over the queue
//! - [`probe`]: [`MetadataReader`] trait and the `mediainfo`-backed implementation
//! - [`track`]: [`Track`] and its quality descriptor

pub mod playlist;
pub mod probe;
pub mod scan;
pub mod track;

use std::path::PathBuf;

use thiserror::Error;

pub use playlist::Playlist;
pub use probe::{MediaInfoReader, MetadataReader, ProbeError, ProbeResult};
pub use scan::{scan_directory, EntryKind, PlaybackQueue, QueueEntry};
pub use track::{AudioQuality, ChannelMode, Track};

/// Errors raised while building the playback queue.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The configured source directory could not be listed.
    #[error("cannot read directory {}: {source}", path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenient Result alias for library operations.
pub type LibraryResult<T> = Result<T, LibraryError>;
