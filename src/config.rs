pub mod error;
pub mod paths;
pub mod settings;

pub use error::ConfigError;
pub use paths::{default_state_root_path, StatePaths, DEFAULT_STATE_ROOT_DIR, STATE_ROOT_ENV};
pub use settings::{load_settings, save_settings, Settings, API_BASE_ENV};
