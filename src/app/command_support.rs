use crate::config::{default_state_root_path, StatePaths};
use crate::console::ConsoleSession;

pub fn resolve_state_paths() -> Result<StatePaths, String> {
    default_state_root_path()
        .map(StatePaths::new)
        .map_err(|e| e.to_string())
}

pub fn open_session(paths: &StatePaths) -> Result<ConsoleSession, String> {
    ConsoleSession::open(paths.clone()).map_err(|e| e.to_string())
}

pub fn parse_number(raw: &str, field: &str) -> Result<f64, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("`{field}` must be a number, got `{raw}`"))?;
    if !value.is_finite() {
        return Err(format!("`{field}` must be a finite number"));
    }
    Ok(value)
}

/// Splits `--name value` pairs off the argument list. Unknown flags are errors.
pub fn take_flags<'a>(
    args: &'a [String],
    known: &[&str],
) -> Result<(Vec<&'a str>, Vec<(String, &'a str)>), String> {
    let mut positional = Vec::new();
    let mut flags = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(name) = arg.strip_prefix("--") {
            if !known.contains(&name) {
                return Err(format!("unknown flag `--{name}`"));
            }
            let value = iter
                .next()
                .ok_or_else(|| format!("flag `--{name}` requires a value"))?;
            flags.push((name.to_string(), value.as_str()));
        } else {
            positional.push(arg.as_str());
        }
    }
    Ok((positional, flags))
}
