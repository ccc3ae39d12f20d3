mod artifact;
mod resolver;
pub mod scanner;
mod settings;

pub use artifact::{relative_artifact_http_path, relative_artifact_path, MavenArtifact};
pub use resolver::{resolve_jar_artifact, ArtifactResolver};
pub use settings::{global_settings, MavenSettings, Profile, SettingsEnv};

/// Maven Central; always the first remote repository.
pub const MAVEN_CENTRAL: &str = "https://repo1.maven.org/maven2/";
