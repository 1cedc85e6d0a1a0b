use crate::app::cli::{help_text, parse_cli_verb, CliVerb};
use crate::app::command_support::resolve_state_paths;
use crate::config::StatePaths;

pub mod alerts;
pub mod config;
pub mod cost;
pub mod dashboard;
pub mod metrics;
pub mod recommendations;
pub mod session;

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }
    let paths = resolve_state_paths()?;
    run_cli_in(&paths, &args)
}

/// Dispatches one command against an explicit state root.
pub fn run_cli_in(paths: &StatePaths, args: &[String]) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }

    let rest = &args[1..];
    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Help => Ok(help_text()),
        CliVerb::Login => session::cmd_login(paths, rest),
        CliVerb::Logout => session::cmd_logout(paths),
        CliVerb::Status => session::cmd_status(paths),
        CliVerb::Stage => session::cmd_stage(paths, rest),
        CliVerb::Continue => session::cmd_continue(paths),
        CliVerb::Dashboard => dashboard::cmd_dashboard(paths),
        CliVerb::Metrics => metrics::cmd_metrics(paths, rest),
        CliVerb::Recommendations => recommendations::cmd_recommendations(paths, rest),
        CliVerb::Cost => cost::cmd_cost(paths, rest),
        CliVerb::Alerts => alerts::cmd_alerts(paths, rest),
        CliVerb::Config => config::cmd_config(paths, rest),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}
