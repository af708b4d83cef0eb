use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Project config file, looked up in the project root.
pub const CONFIG_FILE: &str = "tickets.toml";

/// Environment override for the ticket directory.
pub const DIR_ENV: &str = "TICKETS_DIR";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub store: StoreSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            dir: None,
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

const fn default_lock_timeout_ms() -> u64 {
    5_000
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("tickets")
}

/// Everything a [`crate::store::TicketStore`] needs to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub dir: PathBuf,
    pub lock_timeout: Duration,
}

impl StoreConfig {
    /// Config for a store rooted at `dir` with the default lock timeout.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock_timeout: Duration::from_millis(default_lock_timeout_ms()),
        }
    }
}

/// Read `tickets.toml` from `project_root`, or defaults when it is absent.
///
/// # Errors
///
/// Fails if the file exists but cannot be read or is not valid TOML; the
/// error names the file.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve the store location and lock timeout.
///
/// Directory precedence: `dir_flag` > `TICKETS_DIR` > `tickets.toml` > `tickets/`.
/// Relative paths are taken against `project_root`.
///
/// # Errors
///
/// Propagates [`load_project_config`] failures.
pub fn resolve_store_config(project_root: &Path, dir_flag: Option<&Path>) -> Result<StoreConfig> {
    let project = load_project_config(project_root)?;
    let env_dir = env::var_os(DIR_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    Ok(resolve_inner(project_root, dir_flag, env_dir, &project))
}

fn resolve_inner(
    project_root: &Path,
    dir_flag: Option<&Path>,
    env_dir: Option<PathBuf>,
    project: &ProjectConfig,
) -> StoreConfig {
    let dir = dir_flag
        .map(Path::to_path_buf)
        .or(env_dir)
        .or_else(|| project.store.dir.clone())
        .unwrap_or_else(default_store_dir);

    StoreConfig {
        dir: project_root.join(dir),
        lock_timeout: Duration::from_millis(project.store.lock_timeout_ms),
    }
}
