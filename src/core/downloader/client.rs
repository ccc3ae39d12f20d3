use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::core::error::{ResolveError, ResolveResult};

/// Copy buffer used while streaming a response body to disk.
const BUFFER_SIZE: usize = 16 * 1024;

const APP_USER_AGENT: &str = concat!("jarfetch/", env!("CARGO_PKG_VERSION"));

/// Fetches one remote file onto local disk.
#[async_trait]
pub trait ArtifactDownloader: Send + Sync {
    /// Download `url` to `dest`, creating parent directories as needed.
    /// `label` names the artifact in progress output.
    async fn download_file(&self, label: &str, url: &str, dest: &Path) -> ResolveResult<()>;
}

/// Plain HTTP GET downloader.
pub struct Downloader {
    client: Client,
    /// Print `Downloading <label>` to stdout for each transfer.
    show_progress: bool,
}

impl Downloader {
    /// Downloader over a fresh client. Artifacts are stored byte-for-byte,
    /// so transfer encoding is pinned to identity.
    pub fn new() -> ResolveResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .default_headers(default_headers)
            .build()?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            show_progress: false,
        }
    }

    pub fn with_progress_message(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Stream the body of `url` into `partial`.
    async fn fetch_to(&self, label: &str, url: &str, partial: &Path) -> ResolveResult<()> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let io_error = |source: std::io::Error| ResolveError::Io {
            path: partial.to_path_buf(),
            source,
        };

        let file = tokio::fs::File::create(partial).await.map_err(io_error)?;
        let mut writer = BufWriter::with_capacity(BUFFER_SIZE, file);

        if self.show_progress {
            println!("Downloading {}", label);
        }

        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            writer.write_all(&chunk?).await.map_err(io_error)?;
        }
        writer.flush().await.map_err(io_error)?;
        // writer (and the file handle) is dropped here, before the rename
        Ok(())
    }
}

#[async_trait]
impl ArtifactDownloader for Downloader {
    /// The body lands in `<dest>.part` and is renamed onto `dest` only once
    /// complete; a failed transfer or rename removes the partial file.
    async fn download_file(&self, label: &str, url: &str, dest: &Path) -> ResolveResult<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ResolveError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let partial = partial_path(dest);
        if let Err(e) = self.fetch_to(label, url, &partial).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }

        if let Err(e) = tokio::fs::rename(&partial, dest).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(ResolveError::Io {
                path: dest.to_path_buf(),
                source: e,
            });
        }

        debug!("Downloaded: {} -> {:?}", url, dest);
        Ok(())
    }
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
