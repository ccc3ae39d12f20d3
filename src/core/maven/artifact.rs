use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::core::error::{ResolveError, ResolveResult};

/// A parsed jar coordinate.
///
/// Supported formats:
///   `groupId:artifactId:version`
///   `groupId:artifactId:version:classifier`
///
/// Segments past the classifier are accepted and ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MavenArtifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
}

impl MavenArtifact {
    /// Parse a colon-delimited coordinate string.
    ///
    /// # Examples
    /// ```
    /// use jarfetch_lib::core::maven::MavenArtifact;
    ///
    /// let a = MavenArtifact::parse("org.acme:widget:1.2.0").unwrap();
    /// assert_eq!(a.group_id, "org.acme");
    /// ```
    pub fn parse(coord: &str) -> ResolveResult<Self> {
        let parts: Vec<&str> = coord.split(':').collect();
        if parts.len() < 3 {
            return Err(ResolveError::InvalidCoordinate(coord.to_string()));
        }

        Ok(Self {
            group_id: parts[0].to_string(),
            artifact_id: parts[1].to_string(),
            version: parts[2].to_string(),
            classifier: parts.get(3).map(|c| c.to_string()),
        })
    }

    /// `group/artifact/version/artifact-version` joined with `separator`.
    pub fn relative_path(&self, separator: char) -> String {
        relative_path_with(separator, &self.group_id, &self.artifact_id, &self.version)
    }

    /// Jar file name suffix appended to the relative path: `[-classifier].jar`.
    fn jar_suffix(&self) -> String {
        match &self.classifier {
            Some(c) => format!("-{}.jar", c),
            None => ".jar".to_string(),
        }
    }

    /// Location of the jar under a local repository root.
    pub fn local_jar_path(&self, repository: &Path) -> PathBuf {
        repository.join(self.relative_path(MAIN_SEPARATOR) + &self.jar_suffix())
    }

    /// Location of the companion pom under a local repository root.
    /// The pom is never classified.
    pub fn local_pom_path(&self, repository: &Path) -> PathBuf {
        repository.join(self.relative_path(MAIN_SEPARATOR) + ".pom")
    }

    /// Jar URL under a repository base. `repo_base` is expected to carry
    /// its trailing `/` already.
    pub fn jar_url(&self, repo_base: &str) -> String {
        format!("{}{}{}", repo_base, self.relative_path('/'), self.jar_suffix())
    }

    /// Pom URL under a repository base.
    pub fn pom_url(&self, repo_base: &str) -> String {
        format!("{}{}.pom", repo_base, self.relative_path('/'))
    }
}

impl fmt::Display for MavenArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.classifier {
            Some(c) => write!(
                f,
                "{}:{}:{}:{}",
                self.group_id, self.artifact_id, self.version, c
            ),
            None => write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version),
        }
    }
}

/// Relative artifact path using the platform path separator.
pub fn relative_artifact_path(group_id: &str, artifact_id: &str, version: &str) -> String {
    relative_path_with(MAIN_SEPARATOR, group_id, artifact_id, version)
}

/// Relative artifact path using `/`, for repository URLs.
pub fn relative_artifact_http_path(group_id: &str, artifact_id: &str, version: &str) -> String {
    relative_path_with('/', group_id, artifact_id, version)
}

fn relative_path_with(separator: char, group_id: &str, artifact_id: &str, version: &str) -> String {
    let mut path = group_id.replace('.', &separator.to_string());
    for segment in [artifact_id, version, artifact_id] {
        path.push(separator);
        path.push_str(segment);
    }
    path.push('-');
    path.push_str(version);
    path
}
