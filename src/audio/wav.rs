//! 16-bit PCM WAV encoding.
//!
//! The output is the canonical 44-byte RIFF/WAVE header followed by
//! little-endian sample data. Consumers compare these bytes directly, so the
//! layout and the float-to-int conversion below must not drift.

use std::fmt;
use std::sync::Arc;

use crate::error::{RecorderError, Result};

/// Size of the WAV header in bytes (RIFF + fmt + data chunk headers).
pub const WAV_HEADER_SIZE: usize = 44;

/// Size of the fmt chunk data (16 bytes for PCM).
const WAV_FMT_CHUNK_SIZE: u32 = 16;

/// Audio format code for PCM (uncompressed).
const WAV_FORMAT_PCM: u16 = 1;

const WAV_BITS_PER_SAMPLE: u16 = 16;

const BYTES_PER_SAMPLE: u16 = WAV_BITS_PER_SAMPLE / 8;

/// Header sample rate for `rate` Hz, or `InvalidConfig` if it cannot be
/// represented
///
/// The rate rounds to a whole number of at least 1 Hz, and the derived byte
/// rate (`rate * channels * 2`) must fit the 32-bit header field.
pub fn header_sample_rate(rate: f64, channels: u16) -> Result<u32> {
    let rounded = rate.round();
    let bytes_per_frame = f64::from(channels) * f64::from(BYTES_PER_SAMPLE);

    if !rounded.is_finite() || rounded < 1.0 || rounded * bytes_per_frame > f64::from(u32::MAX) {
        return Err(RecorderError::InvalidConfig(format!(
            "sample rate {}Hz with {} channel(s) does not fit a 16-bit PCM WAV header",
            rate, channels
        )));
    }

    Ok(rounded as u32)
}

/// Encode interleaved float samples as a 16-bit PCM WAV file
///
/// Fails when the byte rate or data length overflow their 32-bit header
/// fields.
pub fn encode(samples: &[f32], sample_rate: u32, channels: u16) -> Result<WavFile> {
    let data_size = u32::try_from(samples.len())
        .ok()
        .and_then(|n| n.checked_mul(u32::from(BYTES_PER_SAMPLE)))
        .filter(|size| size.checked_add(36).is_some())
        .ok_or(RecorderError::ExportTooLarge {
            samples: samples.len(),
        })?;

    let byte_rate = sample_rate
        .checked_mul(u32::from(channels))
        .and_then(|r| r.checked_mul(u32::from(BYTES_PER_SAMPLE)))
        .ok_or_else(|| {
            RecorderError::InvalidConfig(format!(
                "byte rate for {}Hz x {} channel(s) overflows the WAV header",
                sample_rate, channels
            ))
        })?;

    let mut bytes = Vec::with_capacity(WAV_HEADER_SIZE + data_size as usize);

    write_header(&mut bytes, sample_rate, byte_rate, channels, data_size);
    for &sample in samples {
        bytes.extend_from_slice(&float_to_pcm16(sample).to_le_bytes());
    }

    Ok(WavFile {
        bytes: bytes.into(),
    })
}

fn write_header(out: &mut Vec<u8>, sample_rate: u32, byte_rate: u32, channels: u16, data_size: u32) {
    // RIFF container header
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_size).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // fmt subchunk
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&WAV_FMT_CHUNK_SIZE.to_le_bytes());
    out.extend_from_slice(&WAV_FORMAT_PCM.to_le_bytes());
    out.extend_from_slice(&channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());

    out.extend_from_slice(&byte_rate.to_le_bytes());

    let block_align = channels * BYTES_PER_SAMPLE;
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&WAV_BITS_PER_SAMPLE.to_le_bytes());

    // data subchunk header
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());
}

/// Convert a float sample to signed 16-bit PCM.
///
/// Negative values scale by 32768 and non-negative values by 32767, then
/// truncate toward zero. Existing readers of these files rely on this exact
/// asymmetric mapping.
pub fn float_to_pcm16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// An encoded WAV file
///
/// Immutable once produced; clones share the same bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct WavFile {
    bytes: Arc<[u8]>,
}

impl WavFile {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn header(&self) -> Result<WavHeader> {
        WavHeader::parse(&self.bytes)
    }
}

impl AsRef<[u8]> for WavFile {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for WavFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WavFile")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Fields of a canonical 44-byte PCM header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub riff_size: u32,
    pub format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_size: u32,
}

impl WavHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < WAV_HEADER_SIZE {
            return Err(RecorderError::InvalidConfig(format!(
                "WAV header needs {} bytes, got {}",
                WAV_HEADER_SIZE,
                bytes.len()
            )));
        }

        let tag_ok = &bytes[0..4] == b"RIFF"
            && &bytes[8..12] == b"WAVE"
            && &bytes[12..16] == b"fmt "
            && &bytes[36..40] == b"data";
        if !tag_ok {
            return Err(RecorderError::InvalidConfig(
                "not a canonical PCM WAV header".to_string(),
            ));
        }

        let u16_at = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);
        let u32_at = |at: usize| {
            u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };

        Ok(Self {
            riff_size: u32_at(4),
            format: u16_at(20),
            channels: u16_at(22),
            sample_rate: u32_at(24),
            byte_rate: u32_at(28),
            block_align: u16_at(32),
            bits_per_sample: u16_at(34),
            data_size: u32_at(40),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcm_scaling_is_asymmetric() {
        assert_eq!(float_to_pcm16(1.0), 32767);
        assert_eq!(float_to_pcm16(-1.0), -32768);
        assert_eq!(float_to_pcm16(0.0), 0);
        assert_eq!(float_to_pcm16(0.5), 16383); // 16383.5 truncated
        assert_eq!(float_to_pcm16(-0.5), -16384);
    }

    #[test]
    fn test_pcm_clamps_out_of_range() {
        assert_eq!(float_to_pcm16(3.0), 32767);
        assert_eq!(float_to_pcm16(-7.5), -32768);
    }

    #[test]
    fn test_header_bytes() {
        let wav = encode(&[0.0, 0.0, 0.0, 0.0], 48000, 2).unwrap();
        let bytes = wav.as_bytes();

        assert_eq!(bytes.len(), 44 + 8);
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[4..8], &(36u32 + 8).to_le_bytes());
        assert_eq!(&bytes[8..16], b"WAVEfmt ");
        assert_eq!(&bytes[16..20], &16u32.to_le_bytes());
        assert_eq!(&bytes[20..22], &1u16.to_le_bytes());
        assert_eq!(&bytes[22..24], &2u16.to_le_bytes());
        assert_eq!(&bytes[24..28], &48000u32.to_le_bytes());
        assert_eq!(&bytes[28..32], &192000u32.to_le_bytes());
        assert_eq!(&bytes[32..34], &4u16.to_le_bytes());
        assert_eq!(&bytes[34..36], &16u16.to_le_bytes());
        assert_eq!(&bytes[36..40], b"data");
        assert_eq!(&bytes[40..44], &8u32.to_le_bytes());
    }

    #[test]
    fn test_samples_little_endian() {
        let wav = encode(&[1.0, -1.0], 8000, 1).unwrap();
        assert_eq!(&wav.as_bytes()[44..], &[0xFF, 0x7F, 0x00, 0x80]);
    }

    #[test]
    fn test_encode_rejects_byte_rate_overflow() {
        let err = encode(&[0.0; 4], 3_000_000_000, 2).unwrap_err();
        assert!(matches!(err, RecorderError::InvalidConfig(_)));
    }

    #[test]
    fn test_header_sample_rate_bounds() {
        assert_eq!(header_sample_rate(22050.4, 2).unwrap(), 22050);
        assert_eq!(header_sample_rate(0.6, 1).unwrap(), 1);
        assert!(header_sample_rate(0.4, 1).is_err());
        assert!(header_sample_rate(3.0e9, 2).is_err());
        assert!(header_sample_rate(f64::INFINITY, 1).is_err());
        // Largest mono rate whose byte rate still fits
        assert_eq!(header_sample_rate(2_147_483_647.0, 1).unwrap(), 2_147_483_647);
        assert!(header_sample_rate(2_147_483_648.0, 1).is_err());
    }

    #[test]
    fn test_parse_rejects_short_input() {
        assert!(WavHeader::parse(&[0u8; 10]).is_err());
    }
}
