pub mod error;
pub mod render;
pub mod session;

pub use error::ConsoleError;
pub use session::{top_savings, ActionResult, ConsoleSession, DashboardSnapshot, WHATIF_TOP_N};
