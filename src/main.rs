use anyhow::{Context, Result};
use clap::Parser;
use loqa_recorder::{
    AudioBackendConfig, AudioBackendFactory, AudioConfig, AudioSource, Config, RecordingSession,
};
use std::path::PathBuf;
use tracing::info;

/// Replay a WAV file as a live capture, stop on silence and export the result
#[derive(Parser, Debug)]
#[command(name = "loqa-recorder", version)]
struct Args {
    /// WAV file fed to the recorder as if it were being captured
    input: PathBuf,

    /// Where to write the exported WAV
    #[arg(short, long)]
    output: PathBuf,

    /// Config file (extension optional; missing file means defaults)
    #[arg(long, default_value = "config/loqa-recorder")]
    config: String,

    /// Export sample rate in Hz (must not exceed the input rate)
    #[arg(long)]
    sample_rate: Option<f64>,

    /// Keep both channels of a stereo input
    #[arg(long)]
    stereo: bool,

    /// Seconds of silence before recording stops
    #[arg(long)]
    quiet_secs: Option<f64>,

    /// Peak level in dBFS that counts as signal
    #[arg(long, allow_hyphen_values = true)]
    volume_db: Option<f32>,

    /// Frames per channel in each capture block
    #[arg(long)]
    chunk_frames: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut cfg = Config::load(&args.config)?;

    if let Some(rate) = args.sample_rate {
        cfg.recorder.sample_rate = Some(rate);
    }
    if args.stereo {
        cfg.recorder.mono = false;
    }
    if let Some(secs) = args.quiet_secs {
        cfg.recorder.quiet_threshold_secs = secs;
    }
    if let Some(db) = args.volume_db {
        cfg.recorder.volume_threshold_db = db;
    }
    if let Some(frames) = args.chunk_frames {
        cfg.capture.chunk_frames = frames;
    }

    info!("Loqa Recorder v{}", env!("CARGO_PKG_VERSION"));

    let backend_config = AudioBackendConfig {
        chunk_frames: cfg.capture.chunk_frames,
        mono: cfg.recorder.mono,
    };
    let mut backend = AudioBackendFactory::create(AudioSource::File(args.input.clone()), backend_config)
        .context("Failed to create audio backend")?;

    let mut session = RecordingSession::new(cfg.recorder.clone());
    let mut events = session.subscribe();
    info!("Recorder settings: {:?}", session.settings());

    session.initialize(AudioConfig::new(backend.sample_rate(), backend.channel_count()))?;
    info!("Capture format: {:?}", session.config());
    session.start()?;

    let mut audio_rx = backend
        .start()
        .await
        .context("Failed to start audio capture")?;

    let mut exported = None;
    while let Some(frame) = audio_rx.recv().await {
        if let Some(wav) = session.append(frame)? {
            exported = Some(wav);
            break;
        }
    }

    backend.stop().await?;

    let wav = match exported {
        Some(wav) => wav,
        None if session.state().is_terminal() => {
            anyhow::bail!("Session ended in {} state without audio", session.state())
        }
        None => {
            info!("Input exhausted before silence; stopping");
            session.stop_offloaded().await?
        }
    };

    std::fs::write(&args.output, wav.as_bytes())
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    info!("Wrote {} bytes to {}", wav.len(), args.output.display());

    while let Ok(event) = events.try_recv() {
        info!("Session event: {}", event.name());
    }

    println!("{}", serde_json::to_string_pretty(&session.stats())?);

    Ok(())
}
