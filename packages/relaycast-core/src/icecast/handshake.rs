//! Source handshake request building and response inspection.
//!
//! The request is the fixed header block an Icecast source client sends before
//! the body. The server answers `HTTP/1.1 100 Continue` once it accepts the
//! credentials and mount; anything else means the body must not be sent.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::protocol_constants::{
    CONTINUE_STATUS_LINE, DEFAULT_GENRE, DEFAULT_MOUNT, DEFAULT_USER_AGENT, SOURCE_METHOD,
    STREAM_CONTENT_TYPE,
};

/// Remote broadcast server address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEndpoint {
    pub host: String,
    pub port: u16,
}

impl SourceEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for SourceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Source credentials for HTTP Basic authentication.
///
/// `Debug` redacts the password so credentials never reach the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Value of the `Authorization` header: `Basic base64(user:password)`.
    #[must_use]
    pub fn basic_auth_header(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Descriptive headers advertised for the published stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    /// Mount point, always starting with `/`.
    pub mount: String,
    pub genre: String,
    /// Whether the server may list the stream in public directories.
    pub public: bool,
    pub user_agent: String,
}

impl Default for StreamDescriptor {
    fn default() -> Self {
        Self {
            mount: DEFAULT_MOUNT.to_string(),
            genre: DEFAULT_GENRE.to_string(),
            public: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Builds the handshake header block, including the terminating blank line.
#[must_use]
pub fn build_source_request(
    endpoint: &SourceEndpoint,
    credentials: &Credentials,
    descriptor: &StreamDescriptor,
) -> String {
    format!(
        "{method} {mount} HTTP/1.1\r\n\
         Host: http://{endpoint}\r\n\
         Authorization: {auth}\r\n\
         User-Agent: {agent}\r\n\
         Accept: */*\r\n\
         Transfer-Encoding: chunked\r\n\
         Content-Type: {content_type}\r\n\
         Ice-Public: {public}\r\n\
         Ice-Genre: {genre}\r\n\
         Expect: 100-continue\r\n\r\n",
        method = SOURCE_METHOD,
        mount = descriptor.mount,
        endpoint = endpoint,
        auth = credentials.basic_auth_header(),
        agent = descriptor.user_agent,
        content_type = STREAM_CONTENT_TYPE,
        public = u8::from(descriptor.public),
        genre = descriptor.genre,
    )
}

/// Returns true if the response contains the continuation status line.
#[must_use]
pub fn is_continue(response: &[u8]) -> bool {
    let needle = CONTINUE_STATUS_LINE.as_bytes();
    response.len() >= needle.len() && response.windows(needle.len()).any(|w| w == needle)
}

/// First line of a response, for diagnostics.
pub(crate) fn status_line(response: &[u8]) -> String {
    let text = String::from_utf8_lossy(response);
    text.lines().next().unwrap_or_default().trim().to_string()
}
