//! Icecast source protocol: handshake, chunked body framing and the session.
//!
//! Only the subset of HTTP/1.1 needed for a long-lived `PUT` source stream is
//! implemented here; this is not a general HTTP client.

pub mod admin;
pub mod chunked;
pub mod connector;
pub mod handshake;
pub mod session;

pub use admin::{AdminError, AdminResult, IcecastAdminClient, NowPlaying};
pub use chunked::ChunkFramer;
pub use connector::{Connector, SourceStream, TcpConnector};
pub use handshake::{build_source_request, is_continue, Credentials, SourceEndpoint, StreamDescriptor};
pub use session::{BroadcastSession, SessionConfig, SessionError, SessionResult};
