//! The broadcast session: one authenticated, long-lived source connection.
//!
//! A session is opened with a single handshake and then used as an
//! append-only sink. Each [`BroadcastSession::write`] becomes one chunk of the
//! request body; tracks are written back-to-back so the server sees a single
//! uninterrupted stream. The body is only terminated by
//! [`BroadcastSession::close`].
//!
//! The session never reconnects on its own. Write failures are returned to
//! the caller, which owns the reconnect policy.

use std::io;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::chunked::ChunkFramer;
use super::connector::{Connector, SourceStream};
use super::handshake::{
    build_source_request, is_continue, status_line, Credentials, SourceEndpoint,
    StreamDescriptor,
};
use crate::protocol_constants::{HANDSHAKE_RESPONSE_LIMIT, HANDSHAKE_TIMEOUT_SECS, LAST_CHUNK};

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised by the broadcast session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The TCP connection could not be established.
    #[error("failed to connect to {endpoint}: {source}")]
    Dial {
        endpoint: String,
        #[source]
        source: io::Error,
    },

    /// The server answered the handshake without `100 Continue`.
    #[error("server refused the source stream: {status:?}")]
    HandshakeRejected {
        /// First line of the server's response (empty if nothing was read).
        status: String,
    },

    /// The handshake could not be sent or its response could not be read.
    #[error("handshake I/O failed: {0}")]
    HandshakeIo(#[source] io::Error),

    /// The server did not answer the handshake in time.
    #[error("no handshake response within {0:?}")]
    HandshakeTimeout(Duration),

    /// A write was attempted before the handshake completed.
    #[error("session is not ready for audio")]
    NotReady,

    /// Writing to the established connection failed.
    #[error("connection lost: {0}")]
    Connection(#[source] io::Error),
}

/// Convenient Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

impl SessionError {
    /// Returns true if the error happened on an established connection.
    ///
    /// Only these trigger the supervisor's reconnect policy. A failed initial
    /// dial or handshake always ends the run.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, SessionError::Connection(_))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// Everything needed to open a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub endpoint: SourceEndpoint,
    pub credentials: Credentials,
    pub descriptor: StreamDescriptor,
}

/// An authenticated source connection.
///
/// Dropping the session closes the socket without sending the terminating
/// chunk; use [`close`](Self::close) for a graceful end of stream.
pub struct BroadcastSession {
    stream: Box<dyn SourceStream>,
    endpoint: SourceEndpoint,
    framer: ChunkFramer,
    ready: bool,
    /// A chunk write started but never completed, so the framing is broken.
    torn: bool,
    bytes_written: u64,
}

impl std::fmt::Debug for BroadcastSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastSession")
            .field("endpoint", &self.endpoint)
            .field("ready", &self.ready)
            .field("torn", &self.torn)
            .field("bytes_written", &self.bytes_written)
            .finish()
    }
}

impl BroadcastSession {
    /// Dials the server and performs the source handshake.
    ///
    /// # Errors
    ///
    /// - [`SessionError::Dial`] if the connection cannot be established.
    /// - [`SessionError::HandshakeRejected`] if the first response read does
    ///   not contain `HTTP/1.1 100 Continue`.
    /// - [`SessionError::HandshakeIo`] / [`SessionError::HandshakeTimeout`]
    ///   if the exchange itself fails.
    pub async fn open(connector: &dyn Connector, config: &SessionConfig) -> SessionResult<Self> {
        log::info!(
            "[Session] Connecting to {} (mount {})",
            config.endpoint,
            config.descriptor.mount
        );

        let stream = connector
            .connect(&config.endpoint)
            .await
            .map_err(|source| SessionError::Dial {
                endpoint: config.endpoint.to_string(),
                source,
            })?;

        Self::handshake(
            stream,
            config,
            Duration::from_secs(HANDSHAKE_TIMEOUT_SECS),
        )
        .await
    }

    /// Performs the handshake on an already connected stream.
    pub(crate) async fn handshake(
        mut stream: Box<dyn SourceStream>,
        config: &SessionConfig,
        response_timeout: Duration,
    ) -> SessionResult<Self> {
        let request =
            build_source_request(&config.endpoint, &config.credentials, &config.descriptor);
        stream
            .write_all(request.as_bytes())
            .await
            .map_err(SessionError::HandshakeIo)?;
        stream.flush().await.map_err(SessionError::HandshakeIo)?;

        let mut buf = [0u8; HANDSHAKE_RESPONSE_LIMIT];
        let read = tokio::time::timeout(response_timeout, stream.read(&mut buf))
            .await
            .map_err(|_| SessionError::HandshakeTimeout(response_timeout))?
            .map_err(SessionError::HandshakeIo)?;
        let response = &buf[..read];

        if !is_continue(response) {
            let status = status_line(response);
            log::error!(
                "[Session] {} refused data transfer: {:?}",
                config.endpoint,
                status
            );
            return Err(SessionError::HandshakeRejected { status });
        }

        log::info!("[Session] {} accepted the source stream", config.endpoint);

        Ok(Self {
            stream,
            endpoint: config.endpoint.clone(),
            framer: ChunkFramer::new(),
            ready: true,
            torn: false,
            bytes_written: 0,
        })
    }

    /// A connected session whose handshake has not completed.
    #[cfg(test)]
    pub(crate) fn unready(stream: Box<dyn SourceStream>, endpoint: SourceEndpoint) -> Self {
        Self {
            stream,
            endpoint,
            framer: ChunkFramer::new(),
            ready: false,
            torn: false,
            bytes_written: 0,
        }
    }

    /// True once the server acknowledged the handshake, until close or until
    /// a write is abandoned part-way through a chunk.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready && !self.torn
    }

    #[must_use]
    pub fn endpoint(&self) -> &SourceEndpoint {
        &self.endpoint
    }

    /// Audio payload bytes written so far (excluding chunk framing).
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Writes `data` as one chunk and returns the number of payload bytes written.
    ///
    /// Empty writes are a no-op. If the returned future is dropped before it
    /// completes, the session stops accepting writes and [`close`](Self::close)
    /// no longer sends the terminating chunk.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotReady`] if the session is not ready.
    /// - [`SessionError::Connection`] if the socket write fails.
    pub async fn write(&mut self, data: &[u8]) -> SessionResult<usize> {
        if !self.is_ready() {
            return Err(SessionError::NotReady);
        }
        let Some(chunk) = self.framer.frame(data) else {
            return Ok(0);
        };

        self.torn = true;
        self.stream
            .write_all(&chunk)
            .await
            .map_err(SessionError::Connection)?;
        self.stream
            .flush()
            .await
            .map_err(SessionError::Connection)?;
        self.torn = false;

        self.bytes_written += data.len() as u64;
        Ok(data.len())
    }

    /// Ends the stream: sends the terminating chunk and shuts the socket down.
    ///
    /// A session with a half-written chunk is only shut down; a terminator
    /// after a partial chunk would be read as payload.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Connection`] if the terminator cannot be sent.
    /// The socket is released either way.
    pub async fn close(mut self) -> SessionResult<()> {
        if !self.ready {
            return Ok(());
        }
        self.ready = false;

        if self.torn {
            log::warn!(
                "[Session] Abandoning stream to {} mid-chunk after {} bytes",
                self.endpoint,
                self.bytes_written
            );
            return self
                .stream
                .shutdown()
                .await
                .map_err(SessionError::Connection);
        }

        let result = async {
            self.stream.write_all(LAST_CHUNK).await?;
            self.stream.flush().await?;
            self.stream.shutdown().await
        }
        .await;

        log::info!(
            "[Session] Closed stream to {} after {} bytes",
            self.endpoint,
            self.bytes_written
        );

        result.map_err(SessionError::Connection)
    }
}
