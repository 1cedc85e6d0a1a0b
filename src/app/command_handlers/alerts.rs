use crate::api::AlertRequest;
use crate::app::command_support::open_session;
use crate::config::StatePaths;

const USAGE: &str = "usage: alerts send <recipient> <severity> <message...>";

pub fn cmd_alerts(paths: &StatePaths, args: &[String]) -> Result<String, String> {
    if args.len() < 4 || args[0] != "send" {
        return Err(USAGE.to_string());
    }
    let request = AlertRequest {
        recipient: args[1].clone(),
        severity: args[2].to_ascii_uppercase(),
        message: args[3..].join(" "),
    };
    let mut session = open_session(paths)?;
    let ack = session.send_alert(&request).map_err(|e| e.to_string())?;
    let ack = if ack.trim().is_empty() {
        "Alert sent".to_string()
    } else {
        ack
    };
    Ok(format!("alert=sent\nacknowledgement={ack}"))
}
