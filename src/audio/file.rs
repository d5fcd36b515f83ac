use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavReader};
use std::path::Path;
use tracing::info;

/// A WAV file decoded into per-channel float samples
pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    /// One array per channel, normalized to [-1.0, 1.0]
    pub samples: Vec<Vec<f32>>,
}

impl AudioFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Opening audio file: {}", path.display());

        let reader = WavReader::open(path)
            .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;

        let spec = reader.spec();
        if spec.channels == 0 {
            bail!("WAV file declares zero channels");
        }

        let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, 32) => reader
                .into_samples::<f32>()
                .collect::<Result<Vec<_>, _>>()
                .context("Failed to read audio samples")?,
            (SampleFormat::Int, 16) => reader
                .into_samples::<i16>()
                .map(|s| s.map(|s| f32::from(s) / 32768.0))
                .collect::<Result<Vec<_>, _>>()
                .context("Failed to read audio samples")?,
            (format, bits) => bail!(
                "Unsupported WAV sample format: {:?} {}-bit (expected 16-bit int or 32-bit float)",
                format,
                bits
            ),
        };

        let channels = usize::from(spec.channels);
        let mut samples = vec![Vec::with_capacity(interleaved.len() / channels); channels];
        for frame in interleaved.chunks_exact(channels) {
            for (channel, &sample) in samples.iter_mut().zip(frame) {
                channel.push(sample);
            }
        }

        let frames = samples.first().map(Vec::len).unwrap_or(0);
        let duration_seconds = frames as f64 / f64::from(spec.sample_rate);

        info!(
            "Audio file loaded: {:.1}s, {}Hz, {} channels, {} frames",
            duration_seconds, spec.sample_rate, spec.channels, frames
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            samples,
        })
    }

    /// Frames per channel
    pub fn frame_count(&self) -> usize {
        self.samples.first().map(Vec::len).unwrap_or(0)
    }
}
