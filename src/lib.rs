pub mod audio;
pub mod config;
pub mod error;
pub mod session;

pub use audio::{
    AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFile, AudioFrame, AudioSource,
    ContainerType, ExportJob, ExportRequest, SampleBuffer, WavFile, WavHeader,
};
pub use config::Config;
pub use error::{RecorderError, Result};
pub use session::{
    AudioConfig, RecorderSettings, RecordingSession, SessionEvent, SessionState, SessionStats,
    SilenceMonitor,
};
