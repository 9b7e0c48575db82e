//! Fixed protocol constants that should NOT be changed.
//!
//! These values are defined by the Icecast source protocol, HTTP/1.1 chunked
//! framing and the fixed transcode target. Changing them breaks compatibility
//! with the broadcast server.

// ─────────────────────────────────────────────────────────────────────────────
// Icecast Source Handshake
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP method used to publish a source stream.
pub const SOURCE_METHOD: &str = "PUT";

/// Default mount point the stream is published on.
pub const DEFAULT_MOUNT: &str = "/stream.mp3";

/// Content type advertised for the published stream.
pub const STREAM_CONTENT_TYPE: &str = "audio/mpeg";

/// Default genre advertised through `Ice-Genre`.
pub const DEFAULT_GENRE: &str = "Relaycast";

/// Status line the server sends once it accepts the request headers.
///
/// Matched as a literal substring of the first response read.
pub const CONTINUE_STATUS_LINE: &str = "HTTP/1.1 100 Continue";

/// Size of the single bounded read used to inspect the handshake response.
pub const HANDSHAKE_RESPONSE_LIMIT: usize = 1024;

/// Seconds to wait for the handshake response before giving up.
pub const HANDSHAKE_TIMEOUT_SECS: u64 = 10;

// ─────────────────────────────────────────────────────────────────────────────
// Chunked Transfer Encoding
// ─────────────────────────────────────────────────────────────────────────────

/// Line delimiter used by chunk headers and trailers.
pub const CRLF: &[u8] = b"\r\n";

/// Zero-length chunk that terminates a chunked body.
pub const LAST_CHUNK: &[u8] = b"0\r\n\r\n";

// ─────────────────────────────────────────────────────────────────────────────
// Transcode Target
// ─────────────────────────────────────────────────────────────────────────────

/// Output container format requested from the transcoder.
pub const TRANSCODE_FORMAT: &str = "mp3";

/// Audio codec requested from the transcoder.
pub const TRANSCODE_CODEC: &str = "mp3";

/// Constant bitrate of the published stream (kbps).
pub const DEFAULT_BITRATE_KBPS: u32 = 128;

/// Size of the buffer used to pump transcoder output into the session.
///
/// Each filled read becomes one chunk on the wire.
pub const PUMP_BUFFER_SIZE: usize = 16 * 1024;

// ─────────────────────────────────────────────────────────────────────────────
// Icecast Admin
// ─────────────────────────────────────────────────────────────────────────────

/// Admin endpoint used to update the now-playing title.
pub const ADMIN_METADATA_PATH: &str = "/admin/metadata";

/// Timeout for admin HTTP requests (seconds).
pub const ADMIN_TIMEOUT_SECS: u64 = 5;

// ─────────────────────────────────────────────────────────────────────────────
// Application Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str = concat!("Relaycast/", env!("CARGO_PKG_VERSION"));

/// Default number of playback records kept in memory.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;
