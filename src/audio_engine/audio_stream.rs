//! Audio Stream Module
//!
//! This module handles CPAL audio stream management including:
//! - Stream initialization and configuration
//! - Audio callback setup
//! - Real-time message processing

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Stream, StreamConfig};
use rtrb::{Producer, RingBuffer};
use std::sync::{Arc, Mutex};

use crate::audio_engine::constants::{COMMAND_QUEUE_CAPACITY, OUTPUT_BUFFER_FRAMES};
use crate::audio_engine::errors::EngineError;
use crate::audio_engine::mixer::RtMixer;
use crate::messages::ControlMessage;

/// Handle to the audio stream with its command channel
pub struct AudioStreamHandle {
    pub stream: Stream,
    pub producer: Arc<Mutex<Producer<ControlMessage>>>,
    pub output_channels: usize,
    pub output_sample_rate: u32,
}

/// Create and configure the audio stream
///
/// This function:
/// 1. Opens the default output device
/// 2. Creates the ring buffer carrying pad commands to the audio thread
/// 3. Initializes the mixer
/// 4. Builds and returns the (paused) audio stream
pub fn create_audio_stream() -> Result<AudioStreamHandle, EngineError> {
    let host = cpal::default_host();
    let device = host.default_output_device().ok_or(EngineError::NoDevice)?;

    let config = device.default_output_config()?;
    let sample_rate = config.sample_rate();
    let channels = config.channels();

    log::info!(
        "Starting drum machine audio... ({} ch@{} Hz)",
        channels,
        sample_rate
    );

    let (producer, mut consumer) = RingBuffer::new(COMMAND_QUEUE_CAPACITY);

    let mut mixer = RtMixer::new(channels as usize);
    let output_channels = mixer.channels();

    let stream_config = StreamConfig {
        channels,
        sample_rate,
        buffer_size: BufferSize::Fixed(OUTPUT_BUFFER_FRAMES),
    };

    let stream = device.build_output_stream(
        &stream_config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            while let Ok(message) = consumer.pop() {
                mixer.handle(message);
            }

            mixer.render(data);
        },
        |err| {
            log::error!("Audio stream error: {}", err);
        },
        None,
    )?;

    Ok(AudioStreamHandle {
        stream,
        producer: Arc::new(Mutex::new(producer)),
        output_channels,
        output_sample_rate: sample_rate,
    })
}

/// Start playing the audio stream
pub fn start_stream(stream: &Stream) -> Result<(), EngineError> {
    stream.play()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_stream_creation() {
        // Actual stream creation requires audio hardware.
        if cpal::default_host().default_output_device().is_none() {
            return;
        }

        // Headless CI machines may expose a device that still refuses a
        // stream; only a successful handle is checked.
        if let Ok(handle) = create_audio_stream() {
            assert!(handle.output_channels > 0);
            assert!(handle.output_sample_rate > 0);
        }
    }
}
