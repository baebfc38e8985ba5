//! 16-bit PCM WAV encoding for synthesized buffers.

use std::io::Cursor;

use chaos_summoner_core::StereoBuffer;
use thiserror::Error;

/// Errors raised while encoding a buffer as WAV.
#[derive(Debug, Error)]
pub enum WavError {
    /// WAV headers cannot describe a zero sample rate.
    #[error("cannot encode a buffer with a zero sample rate")]
    ZeroSampleRate,
    /// The encoder rejected the stream.
    #[error("failed to encode wav stream")]
    Encode(#[from] hound::Error),
}

/// Encodes the buffer as an interleaved stereo 16-bit PCM WAV file.
pub fn encode_wav(buffer: &StereoBuffer) -> Result<Vec<u8>, WavError> {
    if buffer.sample_rate() == 0 {
        return Err(WavError::ZeroSampleRate);
    }

    let spec = hound::WavSpec {
        channels: StereoBuffer::CHANNELS as u16,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + buffer.frames() * 4));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for sample in buffer.interleaved() {
            writer.write_sample(to_pcm16(sample))?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

fn to_pcm16(sample: f32) -> i16 {
    let clamped = if sample.is_finite() {
        sample.clamp(-1.0, 1.0)
    } else {
        0.0
    };
    (clamped * f32::from(i16::MAX)) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcm_conversion_clamps_out_of_range_samples() {
        assert_eq!(to_pcm16(2.0), i16::MAX);
        assert_eq!(to_pcm16(-2.0), -i16::MAX);
        assert_eq!(to_pcm16(0.0), 0);
        assert_eq!(to_pcm16(f32::INFINITY), 0);
    }

    #[test]
    fn zero_sample_rate_is_rejected() {
        let error = encode_wav(&StereoBuffer::empty(0)).expect_err("zero rate must fail");
        assert!(matches!(error, WavError::ZeroSampleRate));
    }
}
