pub mod backend;
pub mod buffer;
pub mod export;
pub mod file;
pub mod merger;
pub mod resample;
pub mod wav;

pub use backend::{AudioBackend, AudioBackendConfig, AudioBackendFactory, AudioFrame, AudioSource};
pub use buffer::{ChannelBuffer, SampleBuffer};
pub use export::{ContainerType, ExportJob, ExportRequest};
pub use file::AudioFile;
pub use wav::{WavFile, WavHeader};
