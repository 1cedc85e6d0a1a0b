use crate::config::{load_settings, save_settings, Settings, StatePaths};

pub fn cmd_config(paths: &StatePaths, args: &[String]) -> Result<String, String> {
    match args {
        [sub] if sub == "show" => {
            let settings = load_settings(paths).map_err(|e| e.to_string())?;
            serde_yaml::to_string(&settings)
                .map(|body| body.trim_end().to_string())
                .map_err(|e| format!("failed to encode settings: {e}"))
        }
        [sub] if sub == "init" => {
            if paths.settings_file().exists() {
                return Err(format!(
                    "config already exists at {}",
                    paths.settings_file().display()
                ));
            }
            let path = save_settings(paths, &Settings::default()).map_err(|e| e.to_string())?;
            Ok(format!("config=written\npath={}", path.display()))
        }
        _ => Err("usage: config show|init".to_string()),
    }
}
