use anyhow::{bail, Result};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::file::AudioFile;

/// One capture block: the same time window for every channel
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Samples per channel, each in [-1.0, 1.0]
    pub channels: Vec<Vec<f32>>,
    /// Capture clock at the start of this block, in seconds
    pub timestamp_secs: f64,
    /// Level snapshot from the capture side, if it provides one
    pub peak_db: Option<f32>,
}

impl AudioFrame {
    pub fn new(channels: Vec<Vec<f32>>, timestamp_secs: f64) -> Self {
        Self {
            channels,
            timestamp_secs,
            peak_db: None,
        }
    }

    pub fn with_peak_db(mut self, peak_db: f32) -> Self {
        self.peak_db = Some(peak_db);
        self
    }

    /// Frames in the block (length of the first channel)
    pub fn frame_count(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }
}

/// Configuration for audio backend
#[derive(Debug, Clone)]
pub struct AudioBackendConfig {
    /// Frames per channel in each delivered block
    pub chunk_frames: usize,
    /// Deliver only the first channel
    pub mono: bool,
}

impl Default for AudioBackendConfig {
    fn default() -> Self {
        Self {
            chunk_frames: 4096,
            mono: true,
        }
    }
}

/// Audio capture backend trait
///
/// Live device backends live outside this crate; the replay backend below
/// feeds files or generated audio through the same interface.
#[async_trait::async_trait]
pub trait AudioBackend: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive audio frames
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>>;

    /// Stop capturing audio
    async fn stop(&mut self) -> Result<()>;

    /// Check if backend is currently capturing
    fn is_capturing(&self) -> bool;

    /// Sample rate of delivered frames in Hz
    fn sample_rate(&self) -> f64;

    /// Channels per delivered frame
    fn channel_count(&self) -> u16;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Audio backend factory
pub struct AudioBackendFactory;

impl AudioBackendFactory {
    pub fn create(source: AudioSource, config: AudioBackendConfig) -> Result<Box<dyn AudioBackend>> {
        if config.chunk_frames == 0 {
            bail!("chunk_frames must be greater than zero");
        }

        let backend = match source {
            AudioSource::File(path) => {
                let file = AudioFile::open(&path)?;
                ReplayBackend::new(
                    format!("file:{}", path.display()),
                    f64::from(file.sample_rate),
                    file.samples,
                    config,
                )
            }

            AudioSource::Silence {
                sample_rate,
                channels,
                duration_secs,
            } => {
                if sample_rate == 0 || channels == 0 {
                    bail!("silence source needs a non-zero rate and channel count");
                }
                let frames = (f64::from(sample_rate) * duration_secs.max(0.0)).round() as usize;
                ReplayBackend::new(
                    "silence".to_string(),
                    f64::from(sample_rate),
                    vec![vec![0.0; frames]; usize::from(channels)],
                    config,
                )
            }
        };

        Ok(Box::new(backend))
    }
}

/// Audio source type
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// Replay a WAV file as if it were being captured
    File(PathBuf),
    /// Generated digital silence
    Silence {
        sample_rate: u32,
        channels: u16,
        duration_secs: f64,
    },
}

/// Streams preloaded per-channel samples in fixed-size blocks
struct ReplayBackend {
    name: String,
    sample_rate: f64,
    samples: Option<Vec<Vec<f32>>>,
    channel_count: u16,
    chunk_frames: usize,
    task: Option<JoinHandle<()>>,
    capturing: bool,
}

impl ReplayBackend {
    fn new(
        name: String,
        sample_rate: f64,
        mut samples: Vec<Vec<f32>>,
        config: AudioBackendConfig,
    ) -> Self {
        if config.mono {
            samples.truncate(1);
        }

        info!(
            "Replay backend initialized: {} ({}Hz, {} channels, {} frames per block)",
            name,
            sample_rate,
            samples.len(),
            config.chunk_frames
        );

        Self {
            name,
            sample_rate,
            channel_count: samples.len() as u16,
            samples: Some(samples),
            chunk_frames: config.chunk_frames,
            task: None,
            capturing: false,
        }
    }
}

#[async_trait::async_trait]
impl AudioBackend for ReplayBackend {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioFrame>> {
        if self.capturing {
            bail!("Already capturing");
        }

        let Some(samples) = self.samples.take() else {
            bail!("Replay source {} has already been consumed", self.name);
        };

        let (tx, rx) = mpsc::channel(100);
        let chunk_frames = self.chunk_frames;
        let sample_rate = self.sample_rate;

        let task = tokio::spawn(async move {
            let total_frames = samples.first().map(Vec::len).unwrap_or(0);
            let mut offset = 0;

            while offset < total_frames {
                let end = (offset + chunk_frames).min(total_frames);
                let channels = samples.iter().map(|c| c[offset..end].to_vec()).collect();
                let frame = AudioFrame::new(channels, offset as f64 / sample_rate);

                if tx.send(frame).await.is_err() {
                    debug!("Frame receiver dropped at frame {}", offset);
                    break;
                }
                offset = end;
            }
        });

        self.task = Some(task);
        self.capturing = true;

        info!("Replay capture started: {}", self.name);

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if !self.capturing {
            return Ok(());
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.capturing = false;

        info!("Replay capture stopped: {}", self.name);

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn channel_count(&self) -> u16 {
        self.channel_count
    }

    fn name(&self) -> &str {
        &self.name
    }
}
