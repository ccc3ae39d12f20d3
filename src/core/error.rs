use std::path::PathBuf;
use thiserror::Error;

/// Central error type for artifact resolution.
/// Every module returns `Result<T, ResolveError>`.
#[derive(Debug, Error)]
pub enum ResolveError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    #[error("Repository {repository} unavailable: {reason}")]
    RepositoryUnavailable { repository: String, reason: String },

    // ── Maven ───────────────────────────────────────────
    #[error("Invalid Maven coordinate: {0}")]
    InvalidCoordinate(String),

    // ── Settings ────────────────────────────────────────
    #[error("Could not parse maven settings {path:?}: {message}")]
    ConfigParse { path: PathBuf, message: String },
}

/// Convenience alias used throughout the crate.
pub type ResolveResult<T> = Result<T, ResolveError>;

impl From<std::io::Error> for ResolveError {
    fn from(source: std::io::Error) -> Self {
        ResolveError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

// Reports (e.g. `--settings` JSON output) carry errors as plain strings.
impl serde::Serialize for ResolveError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
