use crate::encoding::{EncodingCandidate, DEFAULT_ORDER};
use crate::error::{CardzError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_AUTOSAVE_WINDOW_MS: u64 = 400;
// Kept as .csv so exports open in spreadsheet tools, even though the
// delimiter is `;`.
const DEFAULT_EXPORT_EXT: &str = ".csv";

/// Configuration for cardz, stored in <data dir>/config.json
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardzConfig {
    /// Quiet period after the last edit before the collection is saved
    #[serde(default = "default_autosave_window_ms")]
    pub autosave_window_ms: u64,

    /// File extension used when exporting a deck without an explicit path
    #[serde(default = "default_export_ext")]
    pub export_extension: String,

    /// Encodings tried, in order, when importing
    #[serde(default = "default_encodings")]
    pub encodings: Vec<EncodingCandidate>,
}

fn default_autosave_window_ms() -> u64 {
    DEFAULT_AUTOSAVE_WINDOW_MS
}

fn default_export_ext() -> String {
    DEFAULT_EXPORT_EXT.to_string()
}

fn default_encodings() -> Vec<EncodingCandidate> {
    DEFAULT_ORDER.to_vec()
}

impl Default for CardzConfig {
    fn default() -> Self {
        Self {
            autosave_window_ms: DEFAULT_AUTOSAVE_WINDOW_MS,
            export_extension: DEFAULT_EXPORT_EXT.to_string(),
            encodings: default_encodings(),
        }
    }
}

impl CardzConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(CardzError::Io)?;
        let config: CardzConfig =
            serde_json::from_str(&content).map_err(CardzError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(CardzError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(CardzError::Serialization)?;
        fs::write(config_path, content).map_err(CardzError::Io)?;
        Ok(())
    }

    pub fn autosave_window(&self) -> Duration {
        Duration::from_millis(self.autosave_window_ms)
    }

    /// Set the export extension (normalizes to start with a dot)
    pub fn set_export_extension(&mut self, ext: &str) {
        if ext.starts_with('.') {
            self.export_extension = ext.to_string();
        } else {
            self.export_extension = format!(".{}", ext);
        }
    }

    /// Set the encoding order from a comma separated list, e.g. `utf8,latin1`
    pub fn set_encodings(&mut self, list: &str) -> Result<()> {
        let encodings = list
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<EncodingCandidate>())
            .collect::<Result<Vec<EncodingCandidate>>>()?;
        if encodings.is_empty() {
            return Err(CardzError::Api("At least one encoding is required".into()));
        }
        self.encodings = encodings;
        Ok(())
    }

    /// Keys accepted by [`get`](Self::get) and [`set`](Self::set).
    pub const KEYS: [&'static str; 3] = ["autosave-window", "export-ext", "encodings"];

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "autosave-window" => Some(self.autosave_window_ms.to_string()),
            "export-ext" => Some(self.export_extension.clone()),
            "encodings" => Some(
                self.encodings
                    .iter()
                    .map(|e| e.label())
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "autosave-window" => self.set_autosave_window(value),
            "export-ext" => {
                self.set_export_extension(value.trim());
                Ok(())
            }
            "encodings" => self.set_encodings(value),
            _ => Err(CardzError::Api(format!("Unknown config key: {}", key))),
        }
    }

    pub fn set_autosave_window(&mut self, value: &str) -> Result<()> {
        self.autosave_window_ms = value
            .trim()
            .parse()
            .map_err(|_| CardzError::Api(format!("Invalid autosave window: {}", value)))?;
        Ok(())
    }
}
