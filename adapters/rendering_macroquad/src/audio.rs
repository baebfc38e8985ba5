//! Macroquad playback of the synthesized summon effect.

use chaos_summoner_core::StereoBuffer;
use chaos_summoner_rendering::{AudioError, AudioOutput};
use chaos_summoner_system_tone_synth::encode_wav;
use macroquad::audio::{load_sound_from_bytes, play_sound, PlaySoundParams, Sound};

/// Audio output that replays one preloaded sound.
pub(crate) struct MacroquadAudio {
    sound: Sound,
}

impl MacroquadAudio {
    /// Encodes the effect as WAV and hands it to the mixer.
    pub(crate) async fn load(effect: &StereoBuffer) -> Result<Self, AudioError> {
        let bytes = encode_wav(effect).map_err(|error| AudioError::Prepare(Box::new(error)))?;
        let sound = load_sound_from_bytes(&bytes)
            .await
            .map_err(|error| AudioError::Unavailable(format!("{error:?}")))?;
        Ok(Self { sound })
    }
}

impl AudioOutput for MacroquadAudio {
    fn play(&mut self, volume: f32) -> Result<(), AudioError> {
        play_sound(
            self.sound,
            PlaySoundParams {
                looped: false,
                volume,
            },
        );
        Ok(())
    }
}
