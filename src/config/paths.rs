use super::ConfigError;
use std::path::PathBuf;

pub const DEFAULT_STATE_ROOT_DIR: &str = ".optconsole";
pub const STATE_ROOT_ENV: &str = "OPTCONSOLE_HOME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatePaths {
    pub root: PathBuf,
}

impl StatePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn settings_file(&self) -> PathBuf {
        self.root.join("config.yaml")
    }

    pub fn credential_path(&self) -> PathBuf {
        self.root.join("auth/credential")
    }

    pub fn workflow_state_path(&self) -> PathBuf {
        self.root.join("session/workflow.json")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}

pub fn default_state_root_path() -> Result<PathBuf, ConfigError> {
    if let Some(root) = std::env::var_os(STATE_ROOT_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(root));
    }
    let home = std::env::var_os("HOME").ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(PathBuf::from(home).join(DEFAULT_STATE_ROOT_DIR))
}
