use crate::commands::{CmdMessage, CmdResult};
use crate::config::CardzConfig;
use crate::error::{CardzError, Result};
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Unknown keys and invalid values are errors; nothing is saved for them.
pub fn run(data_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => {
            let config = CardzConfig::load(data_dir)?;
            Ok(CmdResult::default().with_config(config))
        }
        ConfigAction::ShowKey(key) => {
            let config = CardzConfig::load(data_dir)?;
            let value = config
                .get(&key)
                .ok_or_else(|| CardzError::Api(format!("Unknown config key: {}", key)))?;
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::info(value));
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut config = CardzConfig::load(data_dir)?;
            config.set(&key, &value)?;
            config.save(data_dir)?;

            let shown = config.get(&key).unwrap_or(value);
            let mut result = CmdResult::default().with_config(config);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, shown)));
            Ok(result)
        }
    }
}
