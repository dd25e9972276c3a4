// Markshelf Settings Engine
// Loads, saves and edits the JSON settings file that picks the backend and the initial view.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::platform;
use crate::types::errors::SettingsError;
use crate::types::settings::AppSettings;

pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<AppSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &AppSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings persisted as pretty-printed JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: AppSettings,
}

impl SettingsEngine {
    /// Uses `path_override` when given, otherwise `<config_dir>/settings.json`.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override.unwrap_or_else(|| {
            platform::get_config_dir()
                .join("settings.json")
                .to_string_lossy()
                .to_string()
        });

        Self {
            config_path,
            settings: AppSettings::default(),
        }
    }
}

impl SettingsEngineTrait for SettingsEngine {
    /// Missing file means defaults. A malformed file is an error.
    fn load(&mut self) -> Result<AppSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            debug!(path = %self.config_path, "no settings file, using defaults");
            self.settings = AppSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        self.settings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        Ok(self.settings.clone())
    }

    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))
    }

    fn get_settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Updates one setting by dot path, e.g. `backend.kind` or `view.sort_option`.
    ///
    /// The new value is validated by deserializing the whole document back into
    /// `AppSettings`. Saves on success.
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }
        let parts: Vec<&str> = key.split('.').collect();

        let mut json_value = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        let (last, parents) = parts
            .split_last()
            .ok_or_else(|| SettingsError::InvalidKey("Key cannot be empty".to_string()))?;

        let mut current = &mut json_value;
        for part in parents {
            current = current
                .get_mut(*part)
                .ok_or_else(|| SettingsError::InvalidKey(format!("Key '{}' not found in settings", key)))?;
        }

        match current {
            serde_json::Value::Object(map) if map.contains_key(*last) => {
                map.insert(last.to_string(), value);
            }
            serde_json::Value::Object(_) => {
                return Err(SettingsError::InvalidKey(format!(
                    "Key '{}' not found in settings",
                    key
                )));
            }
            _ => {
                return Err(SettingsError::InvalidKey(format!(
                    "Cannot navigate to key '{}': intermediate value is not an object",
                    key
                )));
            }
        }

        self.settings = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        self.save()
    }

    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = AppSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
