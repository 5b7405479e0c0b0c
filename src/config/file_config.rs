use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub api_base_url: Option<String>,
    pub api_key: Option<String>,
    /// Shell command printing the API key, run before every request.
    pub api_key_command: Option<String>,
    pub quality_model: Option<String>,
    pub speed_model: Option<String>,
    pub request_timeout_sec: Option<u64>,
    pub settings_path: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
