//! Sample rate reduction for export.
//!
//! Uses block-average decimation: each output sample is the mean of the
//! input samples that fall inside its window. This is not a band-limited
//! (sinc/FIR) filter and lets some aliasing through, which is acceptable for
//! voice captures.

use crate::error::{RecorderError, Result};

/// Downsample a single channel from `source_rate` to `target_rate`.
///
/// Equal rates return the input unchanged. A target above the source (or a
/// non-positive target) fails with `InvalidRate`.
pub fn downsample(samples: &[f32], source_rate: f64, target_rate: f64) -> Result<Vec<f32>> {
    if target_rate == source_rate {
        return Ok(samples.to_vec());
    }

    if target_rate.is_nan() || target_rate <= 0.0 || target_rate > source_rate {
        return Err(RecorderError::InvalidRate {
            source_rate,
            target_rate,
        });
    }

    let ratio = source_rate / target_rate;
    let output_len = (samples.len() as f64 / ratio).round() as usize;
    let mut output = Vec::with_capacity(output_len);

    let mut offset = 0usize;
    for i in 0..output_len {
        let next_offset = (((i + 1) as f64) * ratio).round() as usize;
        let end = next_offset.min(samples.len());

        let window = samples.get(offset..end).unwrap_or(&[]);
        let average = if window.is_empty() {
            0.0
        } else {
            let sum: f64 = window.iter().map(|&s| f64::from(s)).sum();
            (sum / window.len() as f64) as f32
        };

        output.push(average);
        offset = next_offset;
    }

    Ok(output)
}
