//! Raw byte <-> f32 sample conversion.
//!
//! Producers hand over native-endian 32-bit float samples as raw bytes.

pub const BYTES_PER_SAMPLE: usize = std::mem::size_of::<f32>();

/// Reinterpret raw bytes as f32 samples, ignoring a trailing partial sample.
pub fn decode_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(BYTES_PER_SAMPLE)
        .map(|chunk| f32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Like `decode_f32`, but keeps at most the last `max_samples` whole samples.
///
/// Returns the decoded samples and how many whole samples were skipped at the front.
pub fn decode_f32_tail(bytes: &[u8], max_samples: usize) -> (Vec<f32>, usize) {
    let whole = bytes.len() / BYTES_PER_SAMPLE;
    let skipped = whole.saturating_sub(max_samples);
    let start = skipped * BYTES_PER_SAMPLE;
    let end = whole * BYTES_PER_SAMPLE;
    (decode_f32(&bytes[start..end]), skipped)
}

/// Serialize samples into native-endian bytes.
pub fn encode_f32(samples: &[f32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_ne_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn decode_truncates_partial_sample() {
        let mut bytes = encode_f32(&[0.25, -0.5]);
        bytes.extend_from_slice(&[0xAB, 0xCD]);

        let samples = decode_f32(&bytes);
        assert_eq!(samples.len(), 2);
        assert_relative_eq!(samples[0], 0.25);
        assert_relative_eq!(samples[1], -0.5);
    }

    #[test]
    fn decode_short_input_is_empty() {
        assert!(decode_f32(&[]).is_empty());
        assert!(decode_f32(&[1, 2, 3]).is_empty());
    }

    #[test]
    fn tail_keeps_last_samples() {
        let bytes = encode_f32(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let (samples, skipped) = decode_f32_tail(&bytes, 3);

        assert_eq!(skipped, 2);
        assert_eq!(samples, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn tail_ignores_trailing_partial_before_clamping() {
        let mut bytes = encode_f32(&[1.0, 2.0, 3.0]);
        bytes.push(0xFF);
        let (samples, skipped) = decode_f32_tail(&bytes, 2);

        assert_eq!(skipped, 1);
        assert_eq!(samples, vec![2.0, 3.0]);
    }

    #[test]
    fn tail_within_limit_is_untouched() {
        let bytes = encode_f32(&[0.1, 0.2]);
        let (samples, skipped) = decode_f32_tail(&bytes, 8);

        assert_eq!(skipped, 0);
        assert_eq!(samples.len(), 2);
        assert_relative_eq!(samples[1], 0.2);
    }
}
