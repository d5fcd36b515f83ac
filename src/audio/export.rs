use std::str::FromStr;

use tracing::info;

use super::merger;
use super::resample;
use super::wav::{self, WavFile};
use crate::error::{RecorderError, Result};
use crate::session::RecorderSettings;

/// Container format for exported audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerType {
    #[default]
    Wav,
}

impl FromStr for ContainerType {
    type Err = RecorderError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "wav" | "audio/wav" => Ok(Self::Wav),
            _ => Err(RecorderError::UnsupportedContainer(tag.to_string())),
        }
    }
}

/// How a finished capture should be exported
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportRequest {
    pub container: ContainerType,
    /// Target sample rate; `None` keeps the source rate
    pub target_sample_rate: Option<f64>,
}

impl ExportRequest {
    pub fn wav(target_sample_rate: Option<f64>) -> Self {
        Self {
            container: ContainerType::Wav,
            target_sample_rate,
        }
    }

    pub fn from_settings(settings: &RecorderSettings) -> Self {
        Self::wav(settings.sample_rate)
    }
}

/// A merge -> resample -> encode run over a captured buffer
///
/// The job owns its input and touches no session state, so it can run inline
/// or on the blocking pool with the same result.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Merged samples, one array per channel
    pub channels: Vec<Vec<f32>>,
    pub source_rate: f64,
    pub request: ExportRequest,
}

impl ExportJob {
    pub fn new(channels: Vec<Vec<f32>>, source_rate: f64, request: ExportRequest) -> Self {
        Self {
            channels,
            source_rate,
            request,
        }
    }

    pub fn run(self) -> Result<WavFile> {
        let ContainerType::Wav = self.request.container;

        let channel_count = self.channels.len();
        if channel_count == 0 || channel_count > 2 {
            return Err(RecorderError::InvalidConfig(format!(
                "cannot export {} channel(s)",
                channel_count
            )));
        }

        let target_rate = self.request.target_sample_rate.unwrap_or(self.source_rate);
        let header_rate = wav::header_sample_rate(target_rate, channel_count as u16)?;

        // Each channel is decimated on its own so stereo pairs never average
        // into each other.
        let resampled = self
            .channels
            .iter()
            .map(|channel| resample::downsample(channel, self.source_rate, target_rate))
            .collect::<Result<Vec<_>>>()?;

        let stream = merger::to_stream(resampled)?;
        let wav = wav::encode(&stream, header_rate, channel_count as u16)?;

        info!(
            "Exported WAV: {}Hz -> {}Hz, {} channel(s), {} samples, {} bytes",
            self.source_rate,
            target_rate,
            channel_count,
            stream.len(),
            wav.len()
        );

        Ok(wav)
    }

    /// Run the job on tokio's blocking pool
    pub async fn run_offloaded(self) -> Result<WavFile> {
        tokio::task::spawn_blocking(move || self.run()).await?
    }
}
