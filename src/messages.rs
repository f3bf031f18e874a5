//! Message definitions for communication between the widget and the audio thread.
//!
//! This module defines the enum that serves as the wire format for messages passed through the
//! ring buffer between the UI thread and the real-time audio thread.

use std::sync::Arc;

/// A decoded sample, interleaved at the output channel count and rate.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    pub channels: usize,
    pub samples: Arc<[f32]>,
}

impl SampleBuffer {
    /// Number of frames in the buffer.
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels
    }
}

/// Message that is emitted from the UI side.
#[derive(Debug, Clone)]
pub enum ControlMessage {
    /// Publish a decoded sample into a pad slot.
    ///
    /// # Parameters
    /// * `id` - Pad index (0..9)
    /// * `sample` - Pre-decoded immutable sample buffer (shared handle)
    LoadSample { id: usize, sample: SampleBuffer },

    /// Restart a pad's voice from its first frame.
    ///
    /// # Parameters
    /// * `id` - Pad index
    /// * `volume` - Playback volume captured at trigger time (0.0 to 1.0)
    PlayPad { id: usize, volume: f32 },

    /// Silence every pad.
    StopAll(),
}
