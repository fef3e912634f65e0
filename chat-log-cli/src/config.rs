//! Configuration loading and parsing

use crate::report::OutputFormat;
use anyhow::{Context, Result};
use chat_log_decoder::{DecoderConfig, LocaleSpec, MultiLeavePolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from a TOML file)
///
/// Every section is optional; command-line flags override file values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Custom locale tables; when present they replace the built-in ones
    #[serde(default)]
    pub locales: Vec<LocaleSpec>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    pub transcript: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub include_timeline: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExtractionConfig {
    /// Only enable locales with these tags
    pub locales: Option<Vec<String>>,
    pub multi_leave: Option<MultiLeavePolicy>,
    #[serde(default)]
    pub strict: bool,
}

impl AppConfig {
    /// Build the decoder configuration described by this file
    pub fn decoder_config(&self) -> DecoderConfig {
        let mut config = if self.locales.is_empty() {
            DecoderConfig::new()
        } else {
            DecoderConfig::empty().with_locales(self.locales.clone())
        };

        if let Some(tags) = &self.extraction.locales {
            config = config.retain_locales(tags);
        }
        if let Some(policy) = self.extraction.multi_leave {
            config = config.with_multi_leave_policy(policy);
        }

        config
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
