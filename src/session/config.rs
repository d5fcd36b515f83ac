use serde::{Deserialize, Serialize};

use crate::audio::wav;
use crate::error::{RecorderError, Result};

/// Recorder behaviour shared by every capture cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderSettings {
    /// Capture a single channel
    pub mono: bool,

    /// Seconds of continuous quiet before capture stops on its own
    pub quiet_threshold_secs: f64,

    /// Peak level (dBFS) at or above which the signal counts as present
    pub volume_threshold_db: f32,

    /// Export sample rate; `None` keeps the capture rate
    pub sample_rate: Option<f64>,
}

impl Default for RecorderSettings {
    fn default() -> Self {
        Self {
            mono: true,
            quiet_threshold_secs: 5.0,
            volume_threshold_db: -60.0,
            sample_rate: None,
        }
    }
}

/// Format of the incoming capture stream, fixed once a session is initialized
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Capture sample rate in Hz
    pub sample_rate: f64,

    /// Number of audio channels (1 = mono, 2 = stereo)
    pub channels: u16,
}

impl AudioConfig {
    pub fn new(sample_rate: f64, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Capture format for a device running at `sample_rate`
    pub fn for_capture(sample_rate: f64, mono: bool) -> Self {
        Self::new(sample_rate, if mono { 1 } else { 2 })
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(RecorderError::InvalidConfig(format!(
                "sample rate must be positive, got {}",
                self.sample_rate
            )));
        }

        if !(1..=2).contains(&self.channels) {
            return Err(RecorderError::InvalidConfig(format!(
                "only mono and stereo are supported, got {} channels",
                self.channels
            )));
        }

        wav::header_sample_rate(self.sample_rate, self.channels)?;

        Ok(())
    }
}
