// Integration tests for WAV export
//
// Encoded output is parsed back with hound to make sure an independent
// reader agrees with the header and sample data we write.

use anyhow::Result;
use loqa_recorder::audio::{resample, wav};
use loqa_recorder::{
    AudioConfig, AudioFrame, ExportJob, ExportRequest, RecorderSettings, RecordingSession,
    WavHeader,
};
use std::io::Cursor;

fn read_back(bytes: &[u8]) -> Result<(hound::WavSpec, Vec<i16>)> {
    let reader = hound::WavReader::new(Cursor::new(bytes.to_vec()))?;
    let spec = reader.spec();
    let samples = reader.into_samples::<i16>().collect::<Result<Vec<_>, _>>()?;
    Ok((spec, samples))
}

#[test]
fn test_header_round_trip() -> Result<()> {
    let samples: Vec<f32> = (0..300).map(|i| (i as f32 / 150.0) - 1.0).collect();
    let encoded = wav::encode(&samples, 22050, 2)?;

    let header = WavHeader::parse(encoded.as_bytes())?;
    assert_eq!(header.sample_rate, 22050);
    assert_eq!(header.channels, 2);
    assert_eq!(header.data_size, 600);
    assert_eq!(header.riff_size, 36 + 600);
    assert_eq!(header.format, 1);
    assert_eq!(header.bits_per_sample, 16);
    assert_eq!(header.block_align, 4);
    assert_eq!(header.byte_rate, 22050 * 4);

    let (spec, decoded) = read_back(encoded.as_bytes())?;
    assert_eq!(spec.sample_rate, 22050);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(decoded.len(), 300);
    assert_eq!(decoded[0], -32768);

    Ok(())
}

#[test]
fn test_sample_conversion_matches_reader() -> Result<()> {
    let samples = vec![-1.0, -0.25, 0.0, 0.25, 1.0, 1.5];
    let encoded = wav::encode(&samples, 8000, 1)?;

    let (_, decoded) = read_back(encoded.as_bytes())?;
    assert_eq!(decoded, vec![-32768, -8192, 0, 8191, 32767, 32767]);
    Ok(())
}

#[test]
fn test_empty_capture_is_header_only() -> Result<()> {
    let encoded = wav::encode(&[], 44100, 1)?;
    assert_eq!(encoded.len(), 44);

    let (spec, decoded) = read_back(encoded.as_bytes())?;
    assert_eq!(spec.sample_rate, 44100);
    assert!(decoded.is_empty());
    Ok(())
}

#[test]
fn test_half_rate_export_halves_sample_count() -> Result<()> {
    let settings = RecorderSettings {
        mono: false,
        sample_rate: Some(24000.0),
        ..RecorderSettings::default()
    };
    let mut session = RecordingSession::new(settings);
    session.initialize(AudioConfig::new(48000.0, 2))?;
    session.start()?;

    // 1000 interleaved samples: 500 per channel
    session.append(AudioFrame::new(vec![vec![0.5; 500], vec![-0.5; 500]], 0.0))?;
    let exported = session.stop()?;

    let (spec, decoded) = read_back(exported.as_bytes())?;
    assert_eq!(spec.sample_rate, 24000);
    assert_eq!(spec.channels, 2);
    assert_eq!(decoded.len(), 500);

    // Channels stay separate after decimation
    assert!(decoded.chunks_exact(2).all(|pair| pair[0] == 16383 && pair[1] == -16384));
    Ok(())
}

#[test]
fn test_odd_stereo_frame_count_rounds_per_channel() -> Result<()> {
    // 3 frames per channel at 48k -> 24k: each channel rounds 1.5 up to 2, so
    // the file holds 4 samples where round(6 / 2) over the interleaved
    // stream would give 3.
    let job = ExportJob::new(
        vec![vec![0.5, 0.5, 0.5], vec![-0.5, -0.5, -0.5]],
        48000.0,
        ExportRequest::wav(Some(24000.0)),
    );
    let exported = job.run()?;

    let (spec, decoded) = read_back(exported.as_bytes())?;
    assert_eq!(spec.channels, 2);
    assert_eq!(decoded, vec![16383, -16384, 16383, -16384]);
    assert_eq!(exported.header()?.data_size, 8);
    Ok(())
}

#[test]
fn test_resample_identity_and_rejection() {
    let samples: Vec<f32> = (0..64).map(|i| (i as f32).sin()).collect();

    for rate in [8000.0, 22050.0, 44100.0, 48000.0] {
        assert_eq!(resample::downsample(&samples, rate, rate).unwrap(), samples);
        assert!(resample::downsample(&samples, rate, rate + 1.0).is_err());
    }
}

#[test]
fn test_export_job_default_keeps_source_rate() -> Result<()> {
    let job = ExportJob::new(vec![vec![0.0; 441]], 44100.0, ExportRequest::default());
    let header = job.run()?.header()?;

    assert_eq!(header.sample_rate, 44100);
    assert_eq!(header.channels, 1);
    assert_eq!(header.data_size, 882);
    Ok(())
}
