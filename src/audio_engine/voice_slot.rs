use crate::messages::SampleBuffer;

/// Playback state of a single pad.
///
/// Each pad owns exactly one slot, so retriggering a pad rewinds its voice
/// instead of stacking a second one on top of it.
#[derive(Debug)]
pub struct VoiceSlot {
    pub active: bool,
    pub sample: Option<SampleBuffer>,
    pub frame_pos: usize,
    pub volume: f32,
}

impl VoiceSlot {
    pub fn new() -> Self {
        Self {
            active: false,
            sample: None,
            frame_pos: 0,
            volume: 0.0,
        }
    }

    /// Start (or restart) playback of `sample` from its first frame.
    pub fn restart(&mut self, sample: SampleBuffer, volume: f32) {
        self.active = true;
        self.sample = Some(sample);
        self.frame_pos = 0;
        self.volume = volume;
    }

    pub fn stop(&mut self) {
        self.active = false;
        self.sample = None;
        self.frame_pos = 0;
        self.volume = 0.0;
    }

    /// Mix as much of the remaining sample as fits into `output`.
    ///
    /// The voice deactivates itself once the sample is exhausted.
    pub fn mix_into(&mut self, output: &mut [f32], channels: usize) {
        if !self.active {
            return;
        }

        let Some(sample) = self.sample.as_ref() else {
            self.stop();
            return;
        };

        let sample_frames = sample.frames();
        let remaining = sample_frames.saturating_sub(self.frame_pos);
        let frames = (output.len() / channels).min(remaining);

        for frame in 0..frames {
            let src = (self.frame_pos + frame) * channels;
            let dst = frame * channels;
            for channel in 0..channels {
                output[dst + channel] += sample.samples[src + channel] * self.volume;
            }
        }

        self.frame_pos += frames;
        if self.frame_pos >= sample_frames {
            self.stop();
        }
    }
}

impl Default for VoiceSlot {
    fn default() -> Self {
        Self::new()
    }
}
