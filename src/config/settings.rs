use super::{ConfigError, StatePaths};
use crate::shared::atomic_write_file;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const API_BASE_ENV: &str = "OPTCONSOLE_API_BASE";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default = "default_resource_id")]
    pub default_resource_id: String,
    #[serde(default = "default_whatif_candidates")]
    pub whatif_candidates: Vec<String>,
    #[serde(default = "default_true")]
    pub log_requests: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: None,
            default_resource_id: default_resource_id(),
            whatif_candidates: default_whatif_candidates(),
            log_requests: true,
        }
    }
}

fn default_api_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_resource_id() -> String {
    "ec2-123".to_string()
}

fn default_whatif_candidates() -> Vec<String> {
    ["t2.micro", "t2.small", "t2.medium", "m5.large", "m5.xlarge"]
        .iter()
        .map(|v| v.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = self.api_base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Settings(
                "`api_base_url` must start with http:// or https://".to_string(),
            ));
        }
        if self.default_resource_id.trim().is_empty() {
            return Err(ConfigError::Settings(
                "`default_resource_id` must be non-empty".to_string(),
            ));
        }
        if self.whatif_candidates.is_empty() {
            return Err(ConfigError::Settings(
                "`whatif_candidates` must list at least one instance type".to_string(),
            ));
        }
        if self
            .whatif_candidates
            .iter()
            .any(|candidate| candidate.trim().is_empty())
        {
            return Err(ConfigError::Settings(
                "`whatif_candidates` entries must be non-empty".to_string(),
            ));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::Settings(
                "`request_timeout_secs` must be greater than zero when set".to_string(),
            ));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Some(base) = std::env::var(API_BASE_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
        {
            self.api_base_url = base.trim().to_string();
        }
    }
}

/// Loads `config.yaml` from the state root. A missing file yields defaults.
pub fn load_settings(paths: &StatePaths) -> Result<Settings, ConfigError> {
    let path = paths.settings_file();
    let mut settings = if path.exists() {
        Settings::from_path(&path)?
    } else {
        Settings::default()
    };
    settings.apply_env_overrides();
    settings.validate()?;
    Ok(settings)
}

pub fn save_settings(paths: &StatePaths, settings: &Settings) -> Result<PathBuf, ConfigError> {
    settings.validate()?;
    let path = paths.settings_file();
    let body = serde_yaml::to_string(settings).map_err(|source| ConfigError::Encode {
        path: path.display().to_string(),
        source,
    })?;
    atomic_write_file(&path, body.as_bytes()).map_err(|source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    })?;
    Ok(path)
}
