//! Real-time pad mixer.
//!
//! This module provides the [`RtMixer`] struct which sums the voices of all
//! pads into the output buffer. Every pad has one sample slot and one
//! [`VoiceSlot`], so pads sound independently of each other while a retrigger
//! of the same pad rewinds its voice.

use crate::audio_engine::constants::{NUM_PADS, VOLUME_MAX, VOLUME_MIN};
use crate::audio_engine::voice_slot::VoiceSlot;
use crate::messages::{ControlMessage, SampleBuffer};
use cpal::Sample;

/// Real-time mixer that handles sample loading and voice management.
///
/// All operations are allocation free apart from dropping replaced sample
/// handles, and none of them block.
pub struct RtMixer {
    /// Number of output channels.
    channels: usize,

    /// Sample storage, one slot per pad.
    sample_bank: [Option<SampleBuffer>; NUM_PADS],

    /// One voice per pad.
    voices: [VoiceSlot; NUM_PADS],
}

impl RtMixer {
    /// Creates a new RtMixer with the specified number of channels.
    pub fn new(channels: usize) -> Self {
        Self {
            channels,
            sample_bank: std::array::from_fn(|_| None),
            voices: std::array::from_fn(|_| VoiceSlot::new()),
        }
    }

    /// Applies a control message received from the UI thread.
    pub fn handle(&mut self, message: ControlMessage) {
        match message {
            ControlMessage::LoadSample { id, sample } => self.load_sample(id, sample),
            ControlMessage::PlayPad { id, volume } => self.play_pad(id, volume),
            ControlMessage::StopAll() => self.stop_all(),
        }
    }

    /// Loads a sample into the bank slot for pad `id`.
    ///
    /// Invalid IDs and samples whose channel count differs from the mixer are
    /// silently ignored.
    pub fn load_sample(&mut self, id: usize, sample: SampleBuffer) {
        if id >= NUM_PADS {
            return;
        }

        if sample.channels != self.channels {
            return;
        }

        self.voices[id].stop();
        self.sample_bank[id] = Some(sample);
    }

    /// Restarts pad `id` from its first frame at `volume`.
    ///
    /// A pad without a loaded sample stays silent.
    pub fn play_pad(&mut self, id: usize, volume: f32) {
        if id >= NUM_PADS {
            return;
        }

        if !volume.is_finite() || !(VOLUME_MIN..=VOLUME_MAX).contains(&volume) {
            return;
        }

        let Some(sample) = self.sample_bank[id].as_ref() else {
            return;
        };

        self.voices[id].restart(sample.clone(), volume);
    }

    /// Stops all active voices.
    pub fn stop_all(&mut self) {
        for voice in &mut self.voices {
            voice.stop();
        }
    }

    /// Renders audio frames to the output buffer.
    ///
    /// The output buffer must contain interleaved samples with `channels`
    /// samples per frame.
    pub fn render(&mut self, output: &mut [f32]) {
        output.fill(Sample::EQUILIBRIUM);

        if self.channels == 0 {
            return;
        }

        for voice in &mut self.voices {
            voice.mix_into(output, self.channels);
        }

        for sample in output.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }
    }

    /// Gets the number of channels configured for this mixer.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns true if pad `id` currently has a sounding voice.
    #[cfg(test)]
    pub(crate) fn is_pad_active(&self, id: usize) -> bool {
        self.voices.get(id).is_some_and(|voice| voice.active)
    }
}
