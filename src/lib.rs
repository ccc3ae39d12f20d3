pub mod core;

use tracing_subscriber::EnvFilter;

pub use crate::core::error::{ResolveError, ResolveResult};
pub use crate::core::maven::{
    global_settings, relative_artifact_http_path, relative_artifact_path, resolve_jar_artifact,
    ArtifactResolver, MavenArtifact, MavenSettings, Profile, SettingsEnv,
};

/// Install the process-wide tracing subscriber. `RUST_LOG` overrides the
/// default filter.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,jarfetch_lib=debug")),
        )
        .with_writer(std::io::stderr)
        .init();
}
