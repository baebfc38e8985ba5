#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tone synthesis system producing the summon sound effect.
//!
//! The effect is a descending chirp shaped by an exponential decay envelope
//! with a little uniform noise mixed in. The buffer is synthesized once when an
//! adapter starts and replayed for every summon; [`SoundCues`] decides when and
//! how loud.

mod wav;

use std::f64::consts::TAU;

use chaos_summoner_core::{Event, IntensityLevel, PlaybackRequest, StereoBuffer};
use rand::Rng;
use tracing::debug;

pub use wav::{encode_wav, WavError};

/// Sample rate used when the audio device does not dictate one.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Length of the summon effect in seconds.
pub const DEFAULT_DURATION_SECONDS: f32 = 0.3;

const QUIETEST_VOLUME: f32 = 0.3;
const VOLUME_SPAN: f32 = 0.4;

/// Constants describing the synthesized waveform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneShape {
    /// Instantaneous frequency at the first sample, in hertz.
    pub start_hz: f64,
    /// Instantaneous frequency reached at the end of the buffer, in hertz.
    pub end_hz: f64,
    /// Exponential decay rate of the envelope, per second.
    pub decay_per_second: f64,
    /// Gain applied to the enveloped sine before noise is added.
    pub gain: f64,
    /// Half-width of the uniform noise added to every sample.
    pub noise_amplitude: f64,
}

impl ToneShape {
    /// The "zap" played on every summon.
    pub const ZAP: Self = Self {
        start_hz: 800.0,
        end_hz: 200.0,
        decay_per_second: 8.0,
        gain: 0.3,
        noise_amplitude: 0.05,
    };

    /// Returns the same shape with the noise term removed.
    #[must_use]
    pub const fn without_noise(self) -> Self {
        Self {
            noise_amplitude: 0.0,
            ..self
        }
    }
}

impl Default for ToneShape {
    fn default() -> Self {
        Self::ZAP
    }
}

/// Synthesizes the summon effect using [`ToneShape::ZAP`].
pub fn synthesize<R>(sample_rate: u32, duration_seconds: f32, rng: &mut R) -> StereoBuffer
where
    R: Rng + ?Sized,
{
    synthesize_shape(&ToneShape::ZAP, sample_rate, duration_seconds, rng)
}

/// Synthesizes a stereo buffer of `round(sample_rate × duration_seconds)` frames.
///
/// Non-positive or non-finite durations and a zero sample rate produce an
/// empty buffer. Noise is drawn independently for every sample of every
/// channel; with `noise_amplitude == 0.0` the generator is never consulted and
/// the output is bit-reproducible.
pub fn synthesize_shape<R>(
    shape: &ToneShape,
    sample_rate: u32,
    duration_seconds: f32,
    rng: &mut R,
) -> StereoBuffer
where
    R: Rng + ?Sized,
{
    if sample_rate == 0 || !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return StereoBuffer::empty(sample_rate);
    }

    let rate = f64::from(sample_rate);
    let duration = f64::from(duration_seconds);
    let frames = (rate * duration).round() as usize;
    let sweep = (shape.end_hz - shape.start_hz) / duration;

    let mut render_channel = || -> Vec<f32> {
        (0..frames)
            .map(|index| {
                let t = index as f64 / rate;
                let phase = TAU * (shape.start_hz * t + 0.5 * sweep * t * t);
                let envelope = (-shape.decay_per_second * t).exp();
                let tone = phase.sin() * envelope * shape.gain;
                let noise = if shape.noise_amplitude > 0.0 {
                    rng.gen_range(-shape.noise_amplitude..shape.noise_amplitude)
                } else {
                    0.0
                };
                (tone + noise) as f32
            })
            .collect()
    };

    let left = render_channel();
    let right = render_channel();
    debug!(sample_rate, frames, "synthesized tone buffer");
    // Both channels render exactly `frames` samples.
    StereoBuffer::new(sample_rate, left, right)
        .unwrap_or_else(|| StereoBuffer::empty(sample_rate))
}

/// Playback volume for a summon made at `level`.
///
/// Scales linearly from 0.3 at level zero to 0.7 at the maximum level.
#[must_use]
pub fn playback_volume(level: IntensityLevel) -> f32 {
    let fraction = level.fraction_of_max().clamp(0.0, 1.0);
    QUIETEST_VOLUME + fraction * VOLUME_SPAN
}

/// Pure system that turns summon events into playback requests.
#[derive(Debug, Default)]
pub struct SoundCues {
    muted: bool,
}

impl SoundCues {
    /// Creates a cue system for an unmuted session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether cues are currently suppressed.
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Consumes world events, emitting one request per summon while unmuted.
    ///
    /// Mute toggles take effect for summons that follow them in the slice.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<PlaybackRequest>) {
        for event in events {
            match event {
                Event::MuteToggled { muted } => self.muted = *muted,
                Event::ChaosSummoned { event, .. } if !self.muted => {
                    out.push(PlaybackRequest::new(playback_volume(event.intensity)));
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn volume_spans_expected_range() {
        assert!((playback_volume(IntensityLevel::ZERO) - 0.3).abs() < 1e-6);
        assert!((playback_volume(IntensityLevel::new(25)) - 0.5).abs() < 1e-6);
        assert!((playback_volume(IntensityLevel::MAX) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn invalid_parameters_yield_empty_buffer() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(synthesize(0, 0.3, &mut rng).is_empty());
        assert!(synthesize(44_100, 0.0, &mut rng).is_empty());
        assert!(synthesize(44_100, -1.0, &mut rng).is_empty());
        assert!(synthesize(44_100, f32::NAN, &mut rng).is_empty());
    }

    #[test]
    fn noiseless_buffer_starts_silent() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let buffer = synthesize_shape(&ToneShape::ZAP.without_noise(), 8_000, 0.01, &mut rng);
        assert_eq!(buffer.channel(0).map(|samples| samples[0]), Some(0.0));
    }
}
