use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

pub fn console_log_path(state_root: &Path) -> PathBuf {
    state_root.join("logs/console.log")
}

pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Appends one JSON line to the console log. Failures are swallowed; a broken
/// log must never fail a user action.
pub fn append_console_log(state_root: &Path, level: LogLevel, event: &str, message: &str) {
    let payload = serde_json::json!({
        "timestamp": now_rfc3339(),
        "level": level.as_str(),
        "event": event,
        "message": message,
    });

    let Ok(line) = serde_json::to_string(&payload) else {
        return;
    };

    let path = console_log_path(state_root);
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(mut file) = fs::OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let _ = writeln!(file, "{line}");
}
