use crate::api::AnalyzeRequest;
use crate::app::command_support::{open_session, parse_number, take_flags};
use crate::config::StatePaths;
use crate::console::render::{render_recommendation, render_recommendations, render_workflow};

const USAGE: &str = "usage: recommendations list [resource] | recommendations analyze [resource] [--avg-cpu N] [--avg-memory N] [--idle-hours N] | recommendations latest";

pub fn cmd_recommendations(paths: &StatePaths, args: &[String]) -> Result<String, String> {
    let Some(sub) = args.first() else {
        return Err(USAGE.to_string());
    };
    match sub.as_str() {
        "list" if args.len() <= 2 => {
            let mut session = open_session(paths)?;
            let resource = args.get(1).map(String::as_str).unwrap_or("");
            let recs = session
                .load_recommendations(resource)
                .map_err(|e| e.to_string())?;
            Ok(format!(
                "{}\n{}",
                render_recommendations(&recs),
                render_workflow(&session.controller().state())
            ))
        }
        "analyze" => {
            let (positional, flags) =
                take_flags(&args[1..], &["avg-cpu", "avg-memory", "idle-hours"])?;
            if positional.len() > 1 {
                return Err(USAGE.to_string());
            }
            let mut avg_cpu = None;
            let mut avg_memory = None;
            let mut idle_hours = None;
            for (name, value) in flags {
                let parsed = Some(parse_number(value, &name)?);
                match name.as_str() {
                    "avg-cpu" => avg_cpu = parsed,
                    "avg-memory" => avg_memory = parsed,
                    _ => idle_hours = parsed,
                }
            }
            let request = AnalyzeRequest::new(
                positional.first().copied().unwrap_or(""),
                avg_cpu,
                avg_memory,
                idle_hours,
            );
            let mut session = open_session(paths)?;
            let rec = session.analyze_usage(&request).map_err(|e| e.to_string())?;
            let rendered = rec
                .as_ref()
                .map(render_recommendation)
                .unwrap_or_else(|| "No recommendations available".to_string());
            Ok(format!(
                "{rendered}\n{}",
                render_workflow(&session.controller().state())
            ))
        }
        "latest" if args.len() == 1 => {
            let mut session = open_session(paths)?;
            let rec = session
                .latest_recommendation()
                .map_err(|e| e.to_string())?;
            Ok(rec
                .as_ref()
                .map(render_recommendation)
                .unwrap_or_else(|| "No recommendations yet".to_string()))
        }
        _ => Err(USAGE.to_string()),
    }
}
