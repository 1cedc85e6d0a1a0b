use crate::app::command_support::open_session;
use crate::config::StatePaths;
use crate::console::render::render_workflow;
use crate::workflow::{SelectOutcome, Stage};

pub fn cmd_login(paths: &StatePaths, args: &[String]) -> Result<String, String> {
    if args.len() != 1 {
        return Err("usage: login <username:password>".to_string());
    }
    let mut session = open_session(paths)?;
    session.login(&args[0]).map_err(|e| e.to_string())?;
    Ok(format!(
        "login=ok\nuser={}\n{}",
        session.auth().username().unwrap_or_default(),
        render_workflow(&session.controller().state())
    ))
}

pub fn cmd_logout(paths: &StatePaths) -> Result<String, String> {
    let mut session = open_session(paths)?;
    session.logout().map_err(|e| e.to_string())?;
    Ok(format!(
        "logout=ok\n{}",
        render_workflow(&session.controller().state())
    ))
}

pub fn cmd_status(paths: &StatePaths) -> Result<String, String> {
    let session = open_session(paths)?;
    let user = if session.is_authenticated() {
        session.auth().username().unwrap_or_default()
    } else {
        "none".to_string()
    };
    Ok(format!(
        "authenticated={}\nuser={user}\napi_base={}\n{}",
        session.is_authenticated(),
        session.settings().api_base_url,
        render_workflow(&session.controller().state())
    ))
}

pub fn cmd_stage(paths: &StatePaths, args: &[String]) -> Result<String, String> {
    if args.len() != 1 {
        return Err("usage: stage <dashboard|metrics|recommendations|cost|alerts>".to_string());
    }
    let target = Stage::parse(&args[0])?;
    let mut session = open_session(paths)?;
    let outcome = session.select(target).map_err(|e| e.to_string())?;
    let selection = match outcome {
        SelectOutcome::Switched(stage) => format!("selected={stage}"),
        SelectOutcome::Ignored { requested, .. } => format!("ignored={requested} (locked)"),
    };
    Ok(format!(
        "{selection}\n{}",
        render_workflow(&session.controller().state())
    ))
}

pub fn cmd_continue(paths: &StatePaths) -> Result<String, String> {
    let mut session = open_session(paths)?;
    session.continue_to_metrics().map_err(|e| e.to_string())?;
    Ok(render_workflow(&session.controller().state()))
}
