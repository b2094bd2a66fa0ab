//! Archive download.

use async_trait::async_trait;
use reqwest::Client;
use setup_task_core::{Error, IoResultExt, Result};
use std::path::Path;
use tracing::debug;

/// Fetches a URL into a local file.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Download `url` to `dest`, sending `token` as a bearer token when set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Download`] on transport failure or a non-2xx status,
    /// or an I/O error if `dest` cannot be written.
    async fn download(&self, url: &str, token: Option<&str>, dest: &Path) -> Result<()>;
}

/// [`Downloader`] using `reqwest`.
pub struct HttpDownloader {
    client: Client,
}

impl HttpDownloader {
    /// Create a downloader on `client`.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn download(&self, url: &str, token: Option<&str>, dest: &Path) -> Result<()> {
        debug!(%url, dest = %dest.display(), "Downloading archive");

        let mut request = self.client.get(url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::download(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::download(url, format!("HTTP {status}")));
        }

        let data = response
            .bytes()
            .await
            .map_err(|e| Error::download(url, format!("failed to read body: {e}")))?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_path(parent, "create")?;
        }
        tokio::fs::write(dest, &data).await.with_path(dest, "write")?;

        debug!(%url, bytes = data.len(), "Downloaded archive");
        Ok(())
    }
}
