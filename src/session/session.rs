use super::config::{AudioConfig, RecorderSettings};
use super::events::{EventBus, SessionEvent};
use super::silence::{peak_level_db, SilenceMonitor};
use super::state::SessionState;
use super::stats::SessionStats;
use crate::audio::{merger, AudioFrame, ExportJob, ExportRequest, SampleBuffer, WavFile};
use crate::error::{RecorderError, Result};
use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// A single capture: buffers frames, watches for silence and exports WAV
///
/// The session owns its buffers outright. Frames must be appended in
/// arrival order, with every channel of a frame covering the same window.
pub struct RecordingSession {
    /// Identifier used in log lines and stats
    session_id: String,

    settings: RecorderSettings,

    /// Capture format, set once by `initialize`
    config: Option<AudioConfig>,

    state: SessionState,

    buffer: SampleBuffer,

    monitor: SilenceMonitor,

    events: EventBus,

    /// When the current capture started
    started_at: Option<DateTime<Utc>>,

    /// Peak level of the most recent frame
    last_peak_db: f32,

    /// Whether the last stop came from the silence monitor
    auto_stopped: bool,
}

impl RecordingSession {
    /// Create an uninitialized session
    pub fn new(settings: RecorderSettings) -> Self {
        let session_id = format!("recording-{}", uuid::Uuid::new_v4());
        info!("Creating recording session: {}", session_id);

        let monitor = SilenceMonitor::new(settings.volume_threshold_db, settings.quiet_threshold_secs);

        Self {
            session_id,
            settings,
            config: None,
            state: SessionState::Uninitialized,
            buffer: SampleBuffer::new(0),
            monitor,
            events: EventBus::new(),
            started_at: None,
            last_peak_db: f32::NEG_INFINITY,
            auto_stopped: false,
        }
    }

    /// Receive lifecycle notifications
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Fix the capture format and allocate per-channel buffers
    pub fn initialize(&mut self, config: AudioConfig) -> Result<()> {
        self.require("initialize", &[SessionState::Uninitialized])?;
        config.validate()?;

        info!(
            "Session {} initialized: {}Hz, {} channel(s)",
            self.session_id, config.sample_rate, config.channels
        );

        self.buffer = SampleBuffer::new(usize::from(config.channels));
        self.config = Some(config);
        self.state = SessionState::Ready;
        self.events.emit(SessionEvent::Ready);

        Ok(())
    }

    /// Begin capturing
    pub fn start(&mut self) -> Result<()> {
        self.require("start", &[SessionState::Ready])?;

        info!("Starting recording session: {}", self.session_id);

        self.monitor.rearm();
        self.started_at = Some(Utc::now());
        self.auto_stopped = false;
        self.state = SessionState::Recording;
        self.events.emit(SessionEvent::Start);

        Ok(())
    }

    /// Buffer one capture block and feed its level to the silence monitor
    ///
    /// Returns the exported file when this block pushed the quiet period
    /// over the threshold and the session stopped itself.
    pub fn append(&mut self, frame: AudioFrame) -> Result<Option<WavFile>> {
        self.require("append", &[SessionState::Recording])?;

        let expected = self.buffer.channel_count();
        if frame.channels.len() != expected {
            return Err(RecorderError::ChannelCountMismatch {
                expected,
                actual: frame.channels.len(),
            });
        }

        let frames = frame.frame_count();
        if let Some(uneven) = frame.channels.iter().find(|c| c.len() != frames) {
            return Err(RecorderError::LengthMismatch {
                left: frames,
                right: uneven.len(),
            });
        }

        let peak_db = frame
            .peak_db
            .unwrap_or_else(|| peak_level_db(&frame.channels));
        let now_secs = frame.timestamp_secs;

        for (index, chunk) in frame.channels.into_iter().enumerate() {
            self.buffer.append(index, chunk)?;
        }
        self.last_peak_db = peak_db;

        debug!(
            "Buffered {} frames at {:.3}s (peak {:.1} dB)",
            frames, now_secs, peak_db
        );

        if self.monitor.observe(peak_db, now_secs) {
            info!("Auto-stopping session {} after silence", self.session_id);
            self.auto_stopped = true;
            return self.stop().map(Some);
        }

        Ok(None)
    }

    /// Stop capturing and export the buffer
    ///
    /// On export failure the session stays stopped with its buffer intact;
    /// call `reset` to record again.
    pub fn stop(&mut self) -> Result<WavFile> {
        self.enter_stopped()?;

        let request = ExportRequest::from_settings(&self.settings);
        let result = self.export_job(&request).and_then(ExportJob::run);

        self.finish_stop(result)
    }

    /// Like `stop`, but runs the export on the blocking thread pool
    pub async fn stop_offloaded(&mut self) -> Result<WavFile> {
        self.enter_stopped()?;

        let request = ExportRequest::from_settings(&self.settings);
        let result = match self.export_job(&request) {
            Ok(job) => job.run_offloaded().await,
            Err(e) => Err(e),
        };

        self.finish_stop(result)
    }

    /// Export a stopped capture again with a different request
    pub fn export(&self, request: &ExportRequest) -> Result<WavFile> {
        self.require("export", &[SessionState::Stopped])?;
        self.export_job(request)?.run()
    }

    /// Discard buffered audio and return to ready, keeping the capture format
    pub fn reset(&mut self) -> Result<()> {
        if self.config.is_none() {
            return Err(RecorderError::InvalidState {
                operation: "reset",
                state: self.state,
            });
        }

        info!("Resetting recording session: {}", self.session_id);

        self.buffer.clear();
        self.monitor.rearm();
        self.started_at = None;
        self.last_peak_db = f32::NEG_INFINITY;
        self.auto_stopped = false;
        self.state = SessionState::Ready;
        self.events.emit(SessionEvent::Reset);

        Ok(())
    }

    /// Merged, unencoded samples per channel
    pub fn get_buffer(&self) -> Result<Vec<Vec<f32>>> {
        self.require("read buffer", &[SessionState::Recording, SessionState::Stopped])?;
        self.merged_channels()
    }

    /// Drop everything without exporting
    ///
    /// `End` is only emitted when the session was not already stopped; a
    /// completed stop has announced it.
    pub fn abort(&mut self) {
        if self.state == SessionState::Aborted {
            return;
        }

        warn!(
            "Aborting recording session {} ({} state)",
            self.session_id, self.state
        );

        let was_stopped = self.state == SessionState::Stopped;

        self.buffer.clear();
        self.monitor.rearm();
        self.state = SessionState::Aborted;
        if !was_stopped {
            self.events.emit(SessionEvent::End);
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn settings(&self) -> &RecorderSettings {
        &self.settings
    }

    pub fn config(&self) -> Option<AudioConfig> {
        self.config
    }

    /// Peak level of the most recent frame in dBFS
    pub fn peak_level_db(&self) -> f32 {
        self.last_peak_db
    }

    pub fn total_frames(&self) -> Result<usize> {
        self.buffer.total_frames()
    }

    pub fn stats(&self) -> SessionStats {
        let frames = match self.buffer.total_frames() {
            Ok(frames) => frames,
            Err(e) => {
                warn!("Session {} stats: {}", self.session_id, e);
                0
            }
        };
        let (channels, captured_secs) = match self.config {
            Some(config) => (config.channels, frames as f64 / config.sample_rate),
            None => (0, 0.0),
        };

        SessionStats {
            session_id: self.session_id.clone(),
            state: self.state.to_string(),
            started_at: self.started_at,
            frames,
            channels,
            captured_secs,
            auto_stopped: self.auto_stopped,
        }
    }

    fn require(&self, operation: &'static str, allowed: &[SessionState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(RecorderError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn enter_stopped(&mut self) -> Result<()> {
        self.require("stop", &[SessionState::Recording])?;
        info!("Stopping recording session: {}", self.session_id);
        self.state = SessionState::Stopped;
        Ok(())
    }

    fn finish_stop(&mut self, result: Result<WavFile>) -> Result<WavFile> {
        match &result {
            Ok(wav) => {
                info!(
                    "Recording session {} stopped: {} bytes exported",
                    self.session_id,
                    wav.len()
                );
                self.events.emit(SessionEvent::Data(wav.clone()));
            }
            Err(e) => {
                error!("Export failed for session {}: {}", self.session_id, e);
            }
        }

        self.events.emit(SessionEvent::End);
        result
    }

    fn merged_channels(&self) -> Result<Vec<Vec<f32>>> {
        // Refuse to hand out diverged channels
        self.buffer.total_frames()?;
        Ok(self.buffer.channels().iter().map(merger::merge).collect())
    }

    fn export_job(&self, request: &ExportRequest) -> Result<ExportJob> {
        let config = self.config.ok_or(RecorderError::InvalidState {
            operation: "export",
            state: self.state,
        })?;

        Ok(ExportJob::new(
            self.merged_channels()?,
            config.sample_rate,
            request.clone(),
        ))
    }
}
