use anyhow::{Context, Result};
use serde::Deserialize;

use crate::session::RecorderSettings;

/// Prefix for environment overrides, e.g. `LOQA_RECORDER__RECORDER__MONO=false`
const ENV_PREFIX: &str = "LOQA_RECORDER";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub recorder: RecorderSettings,
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Frames per channel delivered in each capture block
    pub chunk_frames: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { chunk_frames: 4096 }
    }
}

impl Config {
    /// Load settings from `path` (any extension the `config` crate knows,
    /// optional) with environment overrides on top.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX).separator("__"),
            )
            .build()
            .with_context(|| format!("Failed to load config from {}", path))?;

        settings
            .try_deserialize()
            .context("Failed to parse recorder config")
    }
}
