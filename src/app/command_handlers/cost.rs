use crate::api::CostSimulationRequest;
use crate::app::command_support::open_session;
use crate::config::StatePaths;
use crate::console::render::{format_money, render_cost_result, render_what_if, render_workflow};

const USAGE: &str = "usage: cost simulate <current> <recommended> <action> | cost whatif <current> <action> [candidates...] | cost summary";

pub fn cmd_cost(paths: &StatePaths, args: &[String]) -> Result<String, String> {
    let Some(sub) = args.first() else {
        return Err(USAGE.to_string());
    };
    match sub.as_str() {
        "simulate" if args.len() == 4 => {
            let request = CostSimulationRequest {
                current_instance_type: args[1].clone(),
                recommended_instance_type: args[2].clone(),
                action: args[3].clone(),
            };
            let mut session = open_session(paths)?;
            let result = session
                .simulate_cost(&request)
                .map_err(|e| e.to_string())?;
            Ok(format!(
                "{}\n{}",
                render_cost_result(&result),
                render_workflow(&session.controller().state())
            ))
        }
        "whatif" if args.len() >= 3 => {
            let mut session = open_session(paths)?;
            let entries = session
                .compare_what_if(&args[1], &args[3..], &args[2])
                .map_err(|e| e.to_string())?;
            Ok(render_what_if(&entries))
        }
        "summary" if args.len() == 1 => {
            let mut session = open_session(paths)?;
            let summary = session.savings_summary().map_err(|e| e.to_string())?;
            Ok(format!("total_savings={}", format_money(summary.total_savings)))
        }
        _ => Err(USAGE.to_string()),
    }
}
