use crate::app::command_support::open_session;
use crate::config::StatePaths;
use crate::console::render::render_dashboard;
use crate::workflow::Stage;

pub fn cmd_dashboard(paths: &StatePaths) -> Result<String, String> {
    let mut session = open_session(paths)?;
    session.select(Stage::Dashboard).map_err(|e| e.to_string())?;
    let snapshot = session.load_dashboard().map_err(|e| e.to_string())?;
    Ok(render_dashboard(&snapshot))
}
