//! Single owner of the current [`AppSettings`].

use super::{AppSettings, SettingsPersistence, SettingsUpdate};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Prefix of exported settings file names.
pub const EXPORT_FILE_PREFIX: &str = "sumini_settings";

/// File name for an exported settings snapshot taken at `now`.
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("{}_{}.json", EXPORT_FILE_PREFIX, now.timestamp_millis())
}

/// Holds the settings record and writes it through to persistence on every
/// change. Passed explicitly to whoever needs settings.
pub struct SettingsStore {
    settings: AppSettings,
    persistence: Arc<dyn SettingsPersistence>,
}

impl SettingsStore {
    /// Load settings from `persistence`, falling back to defaults when
    /// nothing is stored or the stored blob cannot be decoded.
    pub fn open(persistence: Arc<dyn SettingsPersistence>) -> Self {
        let settings = match persistence.load() {
            Some(blob) => match decode_over_defaults(&blob) {
                Ok(settings) => {
                    debug!("Loaded saved settings");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load settings, using defaults");
                    AppSettings::default()
                }
            },
            None => AppSettings::default(),
        };

        Self {
            settings,
            persistence,
        }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Merge a partial update over the current settings.
    pub fn update(&mut self, update: &SettingsUpdate) {
        self.settings = update.apply_to(&self.settings);
        self.persist();
    }

    /// Restore the default record.
    pub fn reset(&mut self) {
        info!("Resetting settings to defaults");
        self.settings = AppSettings::default();
        self.persist();
    }

    /// Pretty-printed JSON of the current settings.
    pub fn export(&self) -> String {
        // Serializing plain structs of bools, floats and unit enums cannot fail.
        serde_json::to_string_pretty(&self.settings).unwrap_or_default()
    }

    /// Replace settings with `json` merged over the defaults.
    ///
    /// Keys with a value of the wrong type fall back to their defaults.
    /// Returns `false`, leaving the current settings untouched, only when
    /// `json` does not parse.
    pub fn import(&mut self, json: &str) -> bool {
        match decode_over_defaults(json) {
            Ok(settings) => {
                info!("Imported settings");
                self.settings = settings;
                self.persist();
                true
            }
            Err(e) => {
                warn!(error = %e, "Rejected settings import");
                false
            }
        }
    }

    fn persist(&self) {
        self.persistence.save(&self.export());
    }
}

fn decode_over_defaults(json: &str) -> Result<AppSettings, serde_json::Error> {
    let value: Value = serde_json::from_str(json)?;
    let defaults = AppSettings::default();
    let Some(root) = value.as_object() else {
        debug!("Settings JSON is not an object, using defaults");
        return Ok(defaults);
    };

    let settings = AppSettings {
        generation: merge_section("generation", root.get("generation"), defaults.generation),
        ui: merge_section("ui", root.get("ui"), defaults.ui),
        developer: merge_section("developer", root.get("developer"), defaults.developer),
    };
    Ok(settings.sanitized())
}

/// Merge the keys of `incoming` over `default` one at a time. Unknown keys
/// and values that do not fit the field type are skipped.
fn merge_section<T>(name: &str, incoming: Option<&Value>, default: T) -> T
where
    T: Serialize + DeserializeOwned,
{
    let Some(Value::Object(incoming)) = incoming else {
        return default;
    };
    let Ok(Value::Object(mut merged)) = serde_json::to_value(&default) else {
        return default;
    };

    for (key, value) in incoming {
        if !merged.contains_key(key) {
            continue;
        }
        let mut candidate = merged.clone();
        candidate.insert(key.clone(), value.clone());
        if serde_json::from_value::<T>(Value::Object(candidate.clone())).is_ok() {
            merged = candidate;
        } else {
            warn!(section = name, key = %key, "Ignoring mistyped setting");
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or(default)
}
