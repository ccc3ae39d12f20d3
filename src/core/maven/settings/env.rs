use std::ffi::OsString;
use std::path::PathBuf;

const M2_HOME: &str = "M2_HOME";
const MAVEN_REPO_LOCAL: &str = "MAVEN_REPO_LOCAL";
const LOCAL_MAVEN_REPO_PATH: &str = "LOCAL_MAVEN_REPO_PATH";
const REMOTE_MAVEN_REPO: &str = "REMOTE_MAVEN_REPO";
const MAVEN_DOWNLOAD_MESSAGE: &str = "MAVEN_DOWNLOAD_MESSAGE";

/// Process inputs consulted while building [`super::MavenSettings`].
///
/// Read once; everything downstream works from this snapshot so embedders
/// and tests can supply their own values.
#[derive(Debug, Clone, Default)]
pub struct SettingsEnv {
    /// Directory holding `.m2/`.
    pub user_home: PathBuf,
    /// Maven installation, consulted for `conf/settings.xml`.
    pub maven_home: Option<PathBuf>,
    /// Local repository override (`MAVEN_REPO_LOCAL`).
    pub local_repository: Option<PathBuf>,
    /// Deprecated path-list override (`LOCAL_MAVEN_REPO_PATH`); only the first
    /// entry is honoured.
    pub legacy_local_repository: Option<OsString>,
    /// Extra remote repository (`REMOTE_MAVEN_REPO`).
    pub remote_repository: Option<String>,
    /// Print `Downloading ...` lines to stdout.
    pub download_message: bool,
}

impl SettingsEnv {
    pub fn from_process() -> Self {
        Self {
            user_home: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
            maven_home: non_empty_var(M2_HOME).map(PathBuf::from),
            local_repository: non_empty_var(MAVEN_REPO_LOCAL).map(PathBuf::from),
            legacy_local_repository: non_empty_var(LOCAL_MAVEN_REPO_PATH),
            remote_repository: non_empty_var(REMOTE_MAVEN_REPO)
                .map(|v| v.to_string_lossy().into_owned()),
            download_message: non_empty_var(MAVEN_DOWNLOAD_MESSAGE)
                .map(|v| parse_flag(&v.to_string_lossy()))
                .unwrap_or(false),
        }
    }

    /// Inputs with only a home directory set.
    pub fn with_home(user_home: impl Into<PathBuf>) -> Self {
        Self {
            user_home: user_home.into(),
            ..Self::default()
        }
    }

    fn m2_dir(&self) -> PathBuf {
        self.user_home.join(".m2")
    }

    /// `~/.m2/settings.xml`, falling back to `$M2_HOME/conf/settings.xml`.
    /// `None` when neither file exists.
    pub fn settings_file(&self) -> Option<PathBuf> {
        let user = self.m2_dir().join("settings.xml");
        if user.exists() {
            return Some(user);
        }

        self.maven_home
            .as_ref()
            .map(|home| home.join("conf").join("settings.xml"))
            .filter(|global| global.exists())
    }

    pub fn default_local_repository(&self) -> PathBuf {
        self.m2_dir().join("repository")
    }
}

fn non_empty_var(key: &str) -> Option<OsString> {
    std::env::var_os(key).filter(|v| !v.is_empty())
}

/// Only `true`, in any case, enables a flag.
fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}
