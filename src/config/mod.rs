mod file_config;

pub use file_config::FileConfig;

use crate::llm::{ApiKeySource, GeminiProvider};
use crate::session::ModelTiers;
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_QUALITY_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_SPEED_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_REQUEST_TIMEOUT_SEC: u64 = 120;
pub const DEFAULT_SETTINGS_PATH: &str = "sumini_settings.json";

/// Environment variables checked for an API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["SUMINI_API_KEY", "GEMINI_API_KEY"];

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub api_base_url: Option<String>,
    /// Key from the command line or the environment.
    pub api_key: Option<String>,
    pub quality_model: Option<String>,
    pub speed_model: Option<String>,
    pub request_timeout_sec: Option<u64>,
    pub settings_path: Option<PathBuf>,
}

impl CliConfig {
    /// First non-empty API key found in the environment.
    pub fn api_key_from_env() -> Option<String> {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_key: ApiKeySource,
    pub quality_model: String,
    pub speed_model: String,
    pub request_timeout: Duration,
    pub settings_path: PathBuf,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let api_base_url = file
            .api_base_url
            .or_else(|| cli.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            bail!("api_base_url must be an http(s) URL: {}", api_base_url);
        }

        if file.api_key.is_some() && file.api_key_command.is_some() {
            bail!("Only one of api_key and api_key_command may be set in the config file");
        }
        let api_key = if let Some(key) = file.api_key.filter(|k| !k.trim().is_empty()) {
            ApiKeySource::Static(key)
        } else if let Some(cmd) = file.api_key_command {
            ApiKeySource::Command(cmd)
        } else if let Some(key) = cli.api_key.clone().filter(|k| !k.trim().is_empty()) {
            ApiKeySource::Static(key)
        } else {
            warn!(
                "No API key found; set {} or api_key in the config file",
                API_KEY_ENV_VARS.join(" or ")
            );
            ApiKeySource::None
        };

        let quality_model = file
            .quality_model
            .or_else(|| cli.quality_model.clone())
            .unwrap_or_else(|| DEFAULT_QUALITY_MODEL.to_string());
        let speed_model = file
            .speed_model
            .or_else(|| cli.speed_model.clone())
            .unwrap_or_else(|| DEFAULT_SPEED_MODEL.to_string());

        let timeout_sec = file
            .request_timeout_sec
            .or(cli.request_timeout_sec)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SEC);
        if timeout_sec == 0 {
            bail!("request_timeout_sec must be greater than zero");
        }

        let settings_path = file
            .settings_path
            .map(PathBuf::from)
            .or_else(|| cli.settings_path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));

        Ok(Self {
            api_base_url,
            api_key,
            quality_model,
            speed_model,
            request_timeout: Duration::from_secs(timeout_sec),
            settings_path,
        })
    }

    /// Build one Gemini provider per tier.
    pub fn model_tiers(&self) -> ModelTiers {
        let provider = |model: &str| {
            Arc::new(GeminiProvider::new(
                self.api_base_url.clone(),
                model,
                self.api_key.clone(),
            ))
        };
        ModelTiers::new(provider(&self.quality_model), provider(&self.speed_model))
    }
}
