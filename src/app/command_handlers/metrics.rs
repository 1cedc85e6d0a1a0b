use crate::api::Metric;
use crate::app::command_support::{open_session, parse_number};
use crate::config::StatePaths;
use crate::console::render::{render_metric, render_metrics, render_workflow};

const USAGE: &str =
    "usage: metrics resources | metrics list [resource] | metrics collect <resource> <cpu> <memory> <disk>";

pub fn cmd_metrics(paths: &StatePaths, args: &[String]) -> Result<String, String> {
    let Some(sub) = args.first() else {
        return Err(USAGE.to_string());
    };
    let mut session = open_session(paths)?;
    match sub.as_str() {
        "resources" if args.len() == 1 => {
            let resources = session.list_resources().map_err(|e| e.to_string())?;
            Ok(format!(
                "resources={}\n{}",
                resources.len(),
                resources.join("\n")
            )
            .trim_end()
            .to_string())
        }
        "list" if args.len() <= 2 => {
            let resource = args.get(1).map(String::as_str).unwrap_or("");
            let metrics = session.load_metrics(resource).map_err(|e| e.to_string())?;
            Ok(format!(
                "{}\n{}",
                render_metrics(&metrics),
                render_workflow(&session.controller().state())
            ))
        }
        "collect" if args.len() == 5 => {
            let metric = Metric::new(
                args[1].clone(),
                parse_number(&args[2], "cpu")?,
                parse_number(&args[3], "memory")?,
                parse_number(&args[4], "disk")?,
            );
            let stored = session.collect_metric(&metric).map_err(|e| e.to_string())?;
            Ok(format!(
                "collected {}\n{}",
                render_metric(&stored),
                render_workflow(&session.controller().state())
            ))
        }
        _ => Err(USAGE.to_string()),
    }
}
