mod env;
mod parser;

pub use env::SettingsEnv;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use super::MAVEN_CENTRAL;
use crate::core::error::{ResolveError, ResolveResult};
use parser::SettingsDraft;

/// A named bundle of extra remote repositories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub id: String,
    /// Repository base URLs, each ending in `/`, in declaration order.
    pub repositories: Vec<String>,
}

/// Effective repository configuration, immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct MavenSettings {
    local_repository: PathBuf,
    remote_repositories: Vec<String>,
    profiles: HashMap<String, Profile>,
    active_profiles: Vec<String>,
    download_message: bool,
}

impl MavenSettings {
    /// Build settings from environment overrides, the settings file, defaults
    /// and the active profiles, in that order.
    pub async fn load(env: &SettingsEnv) -> ResolveResult<Self> {
        let mut draft = SettingsDraft::default();

        // Environment overrides seed the local repository; the file's
        // <localRepository> replaces them.
        if let Some(paths) = &env.legacy_local_repository {
            if let Some(first) = std::env::split_paths(paths).find(|p| !p.as_os_str().is_empty()) {
                warn!("LOCAL_MAVEN_REPO_PATH is deprecated, use MAVEN_REPO_LOCAL instead");
                draft.local_repository = Some(first);
            }
        }
        if let Some(local) = &env.local_repository {
            draft.local_repository = Some(local.clone());
        }

        if let Some(path) = env.settings_file() {
            info!("Reading maven settings from {:?}", path);
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|source| ResolveError::Io {
                    path: path.clone(),
                    source,
                })?;
            parser::parse_document(bytes.as_slice(), &mut draft).map_err(|e| {
                ResolveError::ConfigParse {
                    path: path.clone(),
                    message: e.to_string(),
                }
            })?;
        }

        let mut remote_repositories = vec![normalize_repository_url(MAVEN_CENTRAL)];
        if let Some(remote) = &env.remote_repository {
            remote_repositories.push(normalize_repository_url(remote));
        }

        let local_repository = draft
            .local_repository
            .unwrap_or_else(|| env.default_local_repository());

        for id in &draft.active_profiles {
            if let Some(profile) = draft.profiles.get(id) {
                remote_repositories.extend(profile.repositories.iter().cloned());
            }
        }

        Ok(Self {
            local_repository,
            remote_repositories,
            profiles: draft.profiles,
            active_profiles: draft.active_profiles,
            download_message: env.download_message,
        })
    }

    /// Settings with an explicit repository list and no profiles. An empty
    /// `remote_repositories` disables remote lookups entirely.
    pub fn with_repositories(
        local_repository: impl Into<PathBuf>,
        remote_repositories: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            local_repository: local_repository.into(),
            remote_repositories: remote_repositories
                .into_iter()
                .map(|url| normalize_repository_url(&url))
                .collect(),
            profiles: HashMap::new(),
            active_profiles: Vec::new(),
            download_message: false,
        }
    }

    pub fn local_repository(&self) -> &Path {
        &self.local_repository
    }

    /// Remote repositories in priority order.
    pub fn remote_repositories(&self) -> &[String] {
        &self.remote_repositories
    }

    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.profiles.get(id)
    }

    pub fn profiles(&self) -> &HashMap<String, Profile> {
        &self.profiles
    }

    pub fn active_profiles(&self) -> &[String] {
        &self.active_profiles
    }

    pub fn download_message(&self) -> bool {
        self.download_message
    }
}

pub(crate) fn normalize_repository_url(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

static SETTINGS: OnceCell<Arc<MavenSettings>> = OnceCell::const_new();

/// Process-wide settings, loaded from the process environment on first use.
///
/// A failed load leaves nothing cached; the next call tries again.
pub async fn global_settings() -> ResolveResult<Arc<MavenSettings>> {
    if let Some(settings) = SETTINGS.get() {
        return Ok(settings.clone());
    }
    cached_settings(&SETTINGS, &SettingsEnv::from_process()).await
}

/// Load settings into `cell` unless it already holds them. Concurrent callers
/// share one load.
pub(crate) async fn cached_settings(
    cell: &OnceCell<Arc<MavenSettings>>,
    env: &SettingsEnv,
) -> ResolveResult<Arc<MavenSettings>> {
    if let Some(settings) = cell.get() {
        return Ok(settings.clone());
    }

    cell.get_or_try_init(|| async { MavenSettings::load(env).await.map(Arc::new) })
        .await
        .cloned()
}
