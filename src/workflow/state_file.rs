use super::controller::WorkflowState;
use crate::shared::{atomic_write_file, remove_file_if_exists};
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to read workflow state {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse workflow state {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode workflow state {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write workflow state {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub fn load_workflow_state(path: &Path) -> Result<Option<WorkflowState>, StateError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StateError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StateError::Parse {
            path: path.display().to_string(),
            source,
        })
}

pub fn save_workflow_state(path: &Path, state: &WorkflowState) -> Result<(), StateError> {
    let body = serde_json::to_vec_pretty(state).map_err(|source| StateError::Encode {
        path: path.display().to_string(),
        source,
    })?;
    atomic_write_file(path, &body).map_err(|source| StateError::Write {
        path: path.display().to_string(),
        source,
    })
}

pub fn clear_workflow_state(path: &Path) -> Result<(), StateError> {
    remove_file_if_exists(path).map_err(|source| StateError::Write {
        path: path.display().to_string(),
        source,
    })
}
