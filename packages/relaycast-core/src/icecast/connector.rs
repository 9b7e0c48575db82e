//! Transport abstraction for the source connection.
//!
//! The session talks to a boxed [`SourceStream`] produced by a [`Connector`].
//! Production code dials TCP; tests hand out one end of an in-memory duplex.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

use super::handshake::SourceEndpoint;

/// Byte stream the session reads the handshake from and writes the body to.
pub trait SourceStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> SourceStream for T {}

/// Opens the transport to the broadcast server.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Dials `endpoint` and returns a connected stream.
    async fn connect(&self, endpoint: &SourceEndpoint) -> io::Result<Box<dyn SourceStream>>;
}

/// Default dial timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Plain TCP connector.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    connect_timeout: Duration,
}

impl TcpConnector {
    #[must_use]
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, endpoint: &SourceEndpoint) -> io::Result<Box<dyn SourceStream>> {
        let stream = tokio::time::timeout(
            self.connect_timeout,
            TcpStream::connect((endpoint.host.as_str(), endpoint.port)),
        )
        .await
        .map_err(|_| {
            io::Error::new(
                io::ErrorKind::TimedOut,
                format!("connect timed out after {:?}", self.connect_timeout),
            )
        })??;

        // Chunks are already sized by the pump; don't hold them back.
        if let Err(e) = stream.set_nodelay(true) {
            log::debug!("[Session] Failed to set TCP_NODELAY: {}", e);
        }

        Ok(Box::new(stream))
    }
}
