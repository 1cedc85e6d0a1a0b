//! Process-wide credential holder.
//!
//! The store owns exactly one `username:password` credential and the flag that
//! says whether a live probe accepted it. It is passed explicitly to the API
//! client; nothing reads it through a global.

use crate::shared::{atomic_write_file, remove_file_if_exists};
use base64::{engine::general_purpose, Engine as _};
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("failed to read credential {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write credential {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to remove credential {path}: {source}")]
    Remove {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Default)]
struct AuthState {
    credential: Option<String>,
    authenticated: bool,
}

#[derive(Debug)]
pub struct AuthStore {
    path: Option<PathBuf>,
    state: RwLock<AuthState>,
}

impl AuthStore {
    /// Store with no backing file; used by tests and short-lived probes.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: RwLock::new(AuthState::default()),
        }
    }

    /// Loads the persisted credential, if any. A stored credential counts as
    /// authenticated until it is cleared.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let path = path.into();
        let credential = read_credential(&path)?;
        let authenticated = credential.is_some();
        Ok(Self {
            path: Some(path),
            state: RwLock::new(AuthState {
                credential,
                authenticated,
            }),
        })
    }

    pub fn set_credential(&self, raw: &str) -> Result<(), AuthError> {
        if let Some(path) = &self.path {
            write_credential(path, raw)?;
        }
        let mut state = self.write_state();
        state.credential = Some(raw.to_string());
        Ok(())
    }

    pub fn clear(&self) -> Result<(), AuthError> {
        {
            let mut state = self.write_state();
            state.credential = None;
            state.authenticated = false;
        }
        if let Some(path) = &self.path {
            remove_file_if_exists(path).map_err(|source| AuthError::Remove {
                path: path.display().to_string(),
                source,
            })?;
        }
        Ok(())
    }

    /// `Basic <base64(raw)>` when a credential is stored. `None` means the
    /// header must be omitted, never sent empty.
    pub fn header(&self) -> Option<String> {
        self.read_state()
            .credential
            .as_deref()
            .map(|raw| format!("Basic {}", general_purpose::STANDARD.encode(raw)))
    }

    pub fn has_credential(&self) -> bool {
        self.read_state().credential.is_some()
    }

    pub fn username(&self) -> Option<String> {
        self.read_state().credential.as_deref().map(|raw| {
            raw.split_once(':')
                .map(|(user, _)| user)
                .unwrap_or(raw)
                .to_string()
        })
    }

    pub fn mark_authenticated(&self) {
        let mut state = self.write_state();
        state.authenticated = state.credential.is_some();
    }

    pub fn is_authenticated(&self) -> bool {
        let state = self.read_state();
        state.authenticated && state.credential.is_some()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, AuthState> {
        self.state.read().unwrap_or_else(|err| err.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, AuthState> {
        self.state.write().unwrap_or_else(|err| err.into_inner())
    }
}

fn read_credential(path: &Path) -> Result<Option<String>, AuthError> {
    match fs::read_to_string(path) {
        Ok(raw) => {
            let trimmed = raw.trim_end_matches(['\r', '\n']);
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(AuthError::Read {
            path: path.display().to_string(),
            source,
        }),
    }
}

fn write_credential(path: &Path, raw: &str) -> Result<(), AuthError> {
    let map_err = |source| AuthError::Write {
        path: path.display().to_string(),
        source,
    };
    atomic_write_file(path, raw.as_bytes()).map_err(map_err)?;

    #[cfg(unix)]
    {
        let mut perms = fs::metadata(path).map_err(map_err)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms).map_err(map_err)?;
    }
    Ok(())
}
