// Integration tests for audio file processing
//
// These tests verify that we can read WAV files and extract per-channel
// float samples correctly.

use anyhow::Result;
use loqa_recorder::audio::AudioFile;
use std::path::Path;
use tempfile::TempDir;

fn write_fixture(path: &Path, spec: hound::WavSpec, frames: &[Vec<i16>]) -> Result<()> {
    let mut writer = hound::WavWriter::create(path, spec)?;
    for frame in frames {
        for &sample in frame {
            writer.write_sample(sample)?;
        }
    }
    writer.finalize()?;
    Ok(())
}

#[test]
fn test_audio_file_open_stereo() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("stereo.wav");

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let frames: Vec<Vec<i16>> = (0..1600).map(|_| vec![16384, -16384]).collect();
    write_fixture(&path, spec, &frames)?;

    let audio = AudioFile::open(&path)?;

    assert_eq!(audio.sample_rate, 16000);
    assert_eq!(audio.channels, 2);
    assert_eq!(audio.frame_count(), 1600);
    assert!((audio.duration_seconds - 0.1).abs() < 0.001, "Duration should be 100ms");
    assert!(audio.samples[0].iter().all(|&s| s == 0.5));
    assert!(audio.samples[1].iter().all(|&s| s == -0.5));
    assert!(audio.path.contains("stereo.wav"));

    Ok(())
}

#[test]
fn test_audio_file_open_float() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("float.wav");

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 48000,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(&path, spec)?;
    for sample in [0.25f32, -0.75, 1.0] {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    let audio = AudioFile::open(&path)?;
    assert_eq!(audio.samples, vec![vec![0.25, -0.75, 1.0]]);
    Ok(())
}

#[test]
fn test_audio_file_rejects_unsupported_depth() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("eight-bit.wav");

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 8,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec)?;
    writer.write_sample(0i8)?;
    writer.finalize()?;

    assert!(AudioFile::open(&path).is_err());
    Ok(())
}

#[test]
fn test_audio_file_missing() {
    assert!(AudioFile::open("/nonexistent/missing.wav").is_err());
}
