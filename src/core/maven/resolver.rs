use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, trace};

use super::artifact::MavenArtifact;
use super::settings::{global_settings, MavenSettings};
use crate::core::downloader::{ArtifactDownloader, Downloader};
use crate::core::error::{ResolveError, ResolveResult};

/// Serializes every resolution in the process, so two callers never download
/// onto the same destination at once.
static ARTIFACT_LOCK: Mutex<()> = Mutex::const_new(());

/// Resolves jar coordinates against the local repository, falling back to
/// the configured remote repositories in priority order.
pub struct ArtifactResolver<D = Downloader> {
    settings: Arc<MavenSettings>,
    downloader: D,
}

impl ArtifactResolver<Downloader> {
    /// Resolver backed by the HTTP [`Downloader`], honouring the settings'
    /// download-message flag.
    pub fn with_default_downloader(settings: Arc<MavenSettings>) -> ResolveResult<Self> {
        let downloader = Downloader::new()?.with_progress_message(settings.download_message());
        Ok(Self::new(settings, downloader))
    }
}

impl<D: ArtifactDownloader> ArtifactResolver<D> {
    pub fn new(settings: Arc<MavenSettings>, downloader: D) -> Self {
        Self {
            settings,
            downloader,
        }
    }

    pub fn settings(&self) -> &MavenSettings {
        &self.settings
    }

    /// Resolve `group:artifact:version[:classifier]` to a local jar.
    ///
    /// `Ok(None)` means no repository has the artifact; that is not an error.
    /// Only a malformed coordinate fails.
    pub async fn resolve(&self, qualifier: &str) -> ResolveResult<Option<PathBuf>> {
        let artifact = MavenArtifact::parse(qualifier)?;
        let local_repository = self.settings.local_repository();
        let jar_path = artifact.local_jar_path(local_repository);
        let pom_path = artifact.local_pom_path(local_repository);

        let _guard = ARTIFACT_LOCK.lock().await;

        if jar_path.exists() {
            debug!("Using cached {} at {:?}", artifact, jar_path);
            return Ok(Some(jar_path));
        }

        let repositories = self.settings.remote_repositories();
        if repositories.is_empty() {
            debug!("{} not in local repository and no remotes configured", artifact);
            return Ok(None);
        }

        for repository in repositories {
            match self
                .fetch_from(repository, &artifact, qualifier, &pom_path, &jar_path)
                .await
            {
                Ok(()) if jar_path.exists() => return Ok(Some(jar_path)),
                Ok(()) => trace!("{} reported success but left no jar", repository),
                Err(e) => trace!("Could not download '{}': {}", artifact, e),
            }
        }

        trace!("Could not find {} in any remote repository", artifact);
        Ok(None)
    }

    /// One attempt against one repository: pom first, then the jar.
    /// A missing pom is tolerated; a missing jar makes the repository unavailable.
    async fn fetch_from(
        &self,
        repository: &str,
        artifact: &MavenArtifact,
        qualifier: &str,
        pom_path: &Path,
        jar_path: &Path,
    ) -> ResolveResult<()> {
        let pom_label = format!("{}:pom", qualifier);
        if let Err(e) = self
            .downloader
            .download_file(&pom_label, &artifact.pom_url(repository), pom_path)
            .await
        {
            trace!("No pom for {} in '{}': {}", artifact, repository, e);
        }

        let jar_label = format!("{}:jar", qualifier);
        self.downloader
            .download_file(&jar_label, &artifact.jar_url(repository), jar_path)
            .await
            .map_err(|e| ResolveError::RepositoryUnavailable {
                repository: repository.to_string(),
                reason: e.to_string(),
            })
    }
}

static RESOLVER: OnceCell<ArtifactResolver> = OnceCell::const_new();

/// Resolve a jar with the process-wide settings and HTTP downloader.
pub async fn resolve_jar_artifact(coordinate: &str) -> ResolveResult<Option<PathBuf>> {
    let resolver = RESOLVER
        .get_or_try_init(|| async { ArtifactResolver::with_default_downloader(global_settings().await?) })
        .await?;
    resolver.resolve(coordinate).await
}
