pub mod fs_atomic;
pub mod logging;
pub mod serde_ext;

pub use fs_atomic::{atomic_write_file, remove_file_if_exists};
pub use logging::{append_console_log, now_rfc3339, LogLevel};
pub use serde_ext::null_as_default;
