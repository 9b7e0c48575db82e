//! HTTP/1.1 chunked transfer encoding for the source body.
//!
//! Every write becomes one chunk: `<hex length>\r\n<bytes>\r\n`. A zero-length
//! chunk ends the body, so empty payloads are never framed.

use std::fmt::Write as _;

use bytes::{BufMut, Bytes, BytesMut};

use crate::protocol_constants::CRLF;

/// Frames payloads as chunks, reusing one scratch buffer across calls.
pub struct ChunkFramer {
    scratch: BytesMut,
}

impl ChunkFramer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            scratch: BytesMut::new(),
        }
    }

    /// Wraps `payload` in a single chunk.
    ///
    /// Returns `None` for an empty payload, which would otherwise be read as
    /// the terminating chunk.
    pub fn frame(&mut self, payload: &[u8]) -> Option<Bytes> {
        if payload.is_empty() {
            return None;
        }

        // 16 hex digits cover any usize.
        self.scratch.reserve(payload.len() + 16 + 2 * CRLF.len());
        // Formatting into BytesMut cannot fail.
        let _ = write!(self.scratch, "{:x}", payload.len());
        self.scratch.put_slice(CRLF);
        self.scratch.put_slice(payload);
        self.scratch.put_slice(CRLF);

        Some(self.scratch.split().freeze())
    }
}

impl Default for ChunkFramer {
    fn default() -> Self {
        Self::new()
    }
}

/// Decodes a chunked body. Returns the payload and whether the terminating
/// chunk was seen. Stops at the first malformed or incomplete chunk.
#[cfg(test)]
pub(crate) fn decode_body(mut raw: &[u8]) -> (Vec<u8>, bool) {
    let mut body = Vec::new();
    loop {
        let Some(line_end) = raw.windows(2).position(|w| w == CRLF) else {
            return (body, false);
        };
        let Some(len) = std::str::from_utf8(&raw[..line_end])
            .ok()
            .and_then(|s| usize::from_str_radix(s, 16).ok())
        else {
            return (body, false);
        };
        raw = &raw[line_end + 2..];
        if len == 0 {
            return (body, raw.starts_with(CRLF));
        }
        if raw.len() < len + 2 || &raw[len..len + 2] != CRLF {
            return (body, false);
        }
        body.extend_from_slice(&raw[..len]);
        raw = &raw[len + 2..];
    }
}
