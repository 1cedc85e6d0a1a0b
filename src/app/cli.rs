#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Help,
    Login,
    Logout,
    Status,
    Stage,
    Dashboard,
    Continue,
    Metrics,
    Recommendations,
    Cost,
    Alerts,
    Config,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "help" | "--help" | "-h" => CliVerb::Help,
        "login" => CliVerb::Login,
        "logout" => CliVerb::Logout,
        "status" => CliVerb::Status,
        "stage" => CliVerb::Stage,
        "dashboard" => CliVerb::Dashboard,
        "continue" => CliVerb::Continue,
        "metrics" => CliVerb::Metrics,
        "recommendations" => CliVerb::Recommendations,
        "cost" => CliVerb::Cost,
        "alerts" => CliVerb::Alerts,
        "config" => CliVerb::Config,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  login <username:password>            Sign in and unlock the Dashboard".to_string(),
        "  logout                               Sign out and lock every stage".to_string(),
        "  status                               Show sign-in and stage progress".to_string(),
        "  stage <name>                         Switch to an unlocked stage".to_string(),
        "  dashboard                            Show monitored resources and savings"
            .to_string(),
        "  continue                             Continue from the Dashboard to Metrics"
            .to_string(),
        "  metrics resources                    List monitored resource ids".to_string(),
        "  metrics list [resource]              Load metrics for a resource".to_string(),
        "  metrics collect <resource> <cpu> <memory> <disk>".to_string(),
        "                                       Submit one metric sample".to_string(),
        "  recommendations list [resource]      Load recommendations for a resource"
            .to_string(),
        "  recommendations analyze [resource] [--avg-cpu N] [--avg-memory N] [--idle-hours N]"
            .to_string(),
        "                                       Request a fresh recommendation".to_string(),
        "  recommendations latest               Show the latest recommendation".to_string(),
        "  cost simulate <current> <recommended> <action>".to_string(),
        "                                       Simulate the monthly cost delta".to_string(),
        "  cost whatif <current> <action> [candidates...]".to_string(),
        "                                       Compare candidates, top five by savings"
            .to_string(),
        "  cost summary                         Show total savings".to_string(),
        "  alerts send <recipient> <severity> <message...>".to_string(),
        "                                       Dispatch an alert".to_string(),
        "  config show|init                     Show or write config.yaml".to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    cli_help_lines().join("\n")
}
