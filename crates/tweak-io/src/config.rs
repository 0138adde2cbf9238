use super::*;

/// Environment variable overriding [`RewriterConfig::project_root`].
pub const PROJECT_ROOT_ENV: &str = "TWEAK_PROJECT_ROOT";

fn default_mailbox_capacity() -> usize {
    100
}

fn default_event_capacity() -> usize {
    64
}

fn default_sync_parent_dir() -> bool {
    true
}

/// Rewriter settings, usually read from a `tweak.toml`.
///
/// ```toml
/// project_root = "/home/me/site"
/// mailbox_capacity = 100
/// event_capacity = 64
/// sync_parent_dir = true
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RewriterConfig {
    /// Writes outside this directory are refused. `None` disables the check.
    #[serde(default)]
    pub project_root: Option<PathBuf>,
    #[serde(default = "default_mailbox_capacity")]
    pub mailbox_capacity: usize,
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
    /// fsync the parent directory after each rename.
    #[serde(default = "default_sync_parent_dir")]
    pub sync_parent_dir: bool,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            project_root: None,
            mailbox_capacity: default_mailbox_capacity(),
            event_capacity: default_event_capacity(),
            sync_parent_dir: default_sync_parent_dir(),
        }
    }
}

impl RewriterConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: Arc::new(e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `TWEAK_PROJECT_ROOT` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(root) = lookup(PROJECT_ROOT_ENV).filter(|s| !s.trim().is_empty()) {
            self.project_root = Some(PathBuf::from(root));
        }
        self
    }
}
