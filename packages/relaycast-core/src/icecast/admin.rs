//! Now-playing title updates through the Icecast admin interface.
//!
//! Icecast accepts `GET /admin/metadata?mount=<mount>&mode=updinfo&song=<title>`
//! authenticated with the source credentials. Updates are best-effort: a
//! failure is logged by the caller and never touches the audio stream.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use thiserror::Error;

use super::handshake::{Credentials, SourceEndpoint};
use crate::protocol_constants::{ADMIN_METADATA_PATH, ADMIN_TIMEOUT_SECS};

/// Errors that can occur while updating stream metadata.
#[derive(Debug, Error)]
pub enum AdminError {
    /// HTTP request to the server failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned a non-success status.
    #[error("HTTP error {0}")]
    HttpStatus(u16),

    /// The admin URL could not be built from the endpoint.
    #[error("invalid admin URL: {0}")]
    InvalidUrl(String),
}

/// Convenient Result alias for admin operations.
pub type AdminResult<T> = Result<T, AdminError>;

/// Publishes the title of the track currently on air.
#[async_trait]
pub trait NowPlaying: Send + Sync {
    async fn update_title(&self, title: &str) -> AdminResult<()>;
}

/// [`NowPlaying`] implementation using the Icecast admin endpoint.
pub struct IcecastAdminClient {
    client: Client,
    endpoint: SourceEndpoint,
    mount: String,
    credentials: Credentials,
}

impl IcecastAdminClient {
    /// Creates a client with its own connection pool and request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Http`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: SourceEndpoint,
        mount: impl Into<String>,
        credentials: Credentials,
    ) -> AdminResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(ADMIN_TIMEOUT_SECS))
            .build()?;
        Ok(Self::with_client(client, endpoint, mount, credentials))
    }

    /// Creates a client sharing an existing `reqwest::Client`.
    pub fn with_client(
        client: Client,
        endpoint: SourceEndpoint,
        mount: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            client,
            endpoint,
            mount: mount.into(),
            credentials,
        }
    }

    /// Builds the metadata update URL for `title`.
    pub(crate) fn metadata_url(&self, title: &str) -> AdminResult<Url> {
        let base = format!(
            "http://{}:{}{}",
            self.endpoint.host, self.endpoint.port, ADMIN_METADATA_PATH
        );
        let mut url = Url::parse(&base).map_err(|e| AdminError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("mount", &self.mount)
            .append_pair("mode", "updinfo")
            .append_pair("song", title);
        Ok(url)
    }
}

#[async_trait]
impl NowPlaying for IcecastAdminClient {
    async fn update_title(&self, title: &str) -> AdminResult<()> {
        let url = self.metadata_url(title)?;

        log::debug!("[Admin] Updating now-playing on {}: {}", self.mount, title);

        let res = self
            .client
            .get(url)
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(AdminError::HttpStatus(status.as_u16()));
        }
        Ok(())
    }
}
