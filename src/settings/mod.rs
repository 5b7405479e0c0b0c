//! User preferences: generation, interface and developer options.
//!
//! The JSON shape (camelCase keys) matches the persisted settings blob.

mod persistence;
mod store;

pub use persistence::{JsonFilePersistence, MemoryPersistence, SettingsPersistence};
pub use store::{export_file_name, SettingsStore, EXPORT_FILE_PREFIX};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const MIN_TEMPERATURE: f32 = 0.0;
pub const MAX_TEMPERATURE: f32 = 2.0;

/// Which model tier to try first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelPreference {
    Speed,
    #[default]
    Quality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationSettings {
    pub model_preference: ModelPreference,
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model_preference: ModelPreference::Quality,
            temperature: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UiSettings {
    pub sound_enabled: bool,
    pub reduced_motion: bool,
    pub high_contrast: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            reduced_motion: false,
            high_contrast: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeveloperSettings {
    pub show_debug: bool,
    pub show_system_prompt: bool,
}

/// All user preferences. Missing keys in a decoded blob fall back to the
/// defaults, unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub generation: GenerationSettings,
    pub ui: UiSettings,
    pub developer: DeveloperSettings,
}

impl AppSettings {
    /// Clamp values that have a valid range.
    pub(crate) fn sanitized(mut self) -> Self {
        self.generation.temperature = clamp_temperature(self.generation.temperature);
        self
    }
}

fn clamp_temperature(value: f32) -> f32 {
    if value.is_nan() {
        GenerationSettings::default().temperature
    } else {
        value.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationUpdate {
    pub model_preference: Option<ModelPreference>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiUpdate {
    pub sound_enabled: Option<bool>,
    pub reduced_motion: Option<bool>,
    pub high_contrast: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeveloperUpdate {
    pub show_debug: Option<bool>,
    pub show_system_prompt: Option<bool>,
}

/// Partial update. Each supplied section is merged key by key over the
/// current one; sections left as `None` are untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub generation: Option<GenerationUpdate>,
    pub ui: Option<UiUpdate>,
    pub developer: Option<DeveloperUpdate>,
}

impl SettingsUpdate {
    pub fn generation(update: GenerationUpdate) -> Self {
        Self {
            generation: Some(update),
            ..Default::default()
        }
    }

    pub fn ui(update: UiUpdate) -> Self {
        Self {
            ui: Some(update),
            ..Default::default()
        }
    }

    pub fn developer(update: DeveloperUpdate) -> Self {
        Self {
            developer: Some(update),
            ..Default::default()
        }
    }

    /// Apply this update on top of `current`, returning the merged record.
    pub fn apply_to(&self, current: &AppSettings) -> AppSettings {
        let mut next = current.clone();

        if let Some(g) = &self.generation {
            next.generation = GenerationSettings {
                model_preference: g
                    .model_preference
                    .unwrap_or(current.generation.model_preference),
                temperature: g
                    .temperature
                    .map(clamp_temperature)
                    .unwrap_or(current.generation.temperature),
            };
        }

        if let Some(u) = &self.ui {
            next.ui = UiSettings {
                sound_enabled: u.sound_enabled.unwrap_or(current.ui.sound_enabled),
                reduced_motion: u.reduced_motion.unwrap_or(current.ui.reduced_motion),
                high_contrast: u.high_contrast.unwrap_or(current.ui.high_contrast),
            };
        }

        if let Some(d) = &self.developer {
            next.developer = DeveloperSettings {
                show_debug: d.show_debug.unwrap_or(current.developer.show_debug),
                show_system_prompt: d
                    .show_system_prompt
                    .unwrap_or(current.developer.show_system_prompt),
            };
        }

        next
    }
}
