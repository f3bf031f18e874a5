//! Audio Engine Module
//!
//! This module provides real-time playback of the drum pads. It is organized
//! into sub-modules, each with a specific responsibility:
//!
//! - [`audio_stream`]: CPAL audio stream management and real-time callback
//! - [`constants`]: Configuration constants and limits
//! - [`errors`]: Audio-specific error types
//! - [`mixer`]: Real-time mixing of the pad voices
//! - [`sample_loader`]: Audio file loading and decoding
//!
//! The main [`AudioEngine`] struct owns the output stream and hands out
//! [`EngineClip`] handles, one per pad, which the drum machine plays through.

use crate::audio_engine::audio_stream::{AudioStreamHandle, create_audio_stream, start_stream};
use crate::audio_engine::constants::{NUM_PADS, VOLUME_MAX, VOLUME_MIN};
use crate::audio_engine::errors::EngineError;
use crate::audio_engine::sample_loader::{
    LoadStage, decode_audio_file_to_sample_buffer_with_progress,
};
use crate::machine::Clip;
use crate::messages::ControlMessage;
use crate::sound_bank::SOUND_BANK;
use rtrb::Producer;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub mod audio_stream;
pub mod channels;
pub mod constants;
pub mod errors;
pub mod mixer;
pub mod resample;
pub mod sample_loader;
pub mod voice_slot;

type SharedProducer = Arc<Mutex<Producer<ControlMessage>>>;

fn push(
    producer: &SharedProducer,
    message: ControlMessage,
    what: &'static str,
) -> Result<(), EngineError> {
    let mut producer_guard = producer.lock().map_err(|_| EngineError::LockPoisoned)?;

    producer_guard
        .push(message)
        .map_err(|_| EngineError::QueueFull(what))
}

fn check_pad(id: usize) -> Result<(), EngineError> {
    if id >= NUM_PADS {
        return Err(EngineError::PadOutOfRange { id, max: NUM_PADS });
    }
    Ok(())
}

fn check_volume(volume: f32) -> Result<(), EngineError> {
    if !volume.is_finite() || !(VOLUME_MIN..=VOLUME_MAX).contains(&volume) {
        return Err(EngineError::VolumeOutOfRange(volume));
    }
    Ok(())
}

/// AudioEngine owns the default output device stream.
#[derive(Default)]
pub struct AudioEngine {
    stream_handle: Option<AudioStreamHandle>,
}

impl AudioEngine {
    /// Create a new, not yet running, AudioEngine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the default device and start the output stream.
    pub fn run(&mut self) -> Result<(), EngineError> {
        if self.stream_handle.is_some() {
            return Err(EngineError::AlreadyRunning);
        }

        let handle = create_audio_stream()?;
        start_stream(&handle.stream)?;
        self.stream_handle = Some(handle);
        Ok(())
    }

    /// Shut down the audio engine, dropping the stream.
    pub fn shut_down(&mut self) {
        if self.stream_handle.take().is_some() {
            log::info!("Audio engine shut down");
        }
    }

    pub fn is_running(&self) -> bool {
        self.stream_handle.is_some()
    }

    /// Output channel count and sample rate of the running stream.
    pub fn output_format(&self) -> Option<(usize, u32)> {
        self.stream_handle
            .as_ref()
            .map(|handle| (handle.output_channels, handle.output_sample_rate))
    }

    fn handle(&self) -> Result<&AudioStreamHandle, EngineError> {
        self.stream_handle.as_ref().ok_or(EngineError::NotRunning)
    }

    /// Decode `path` and publish it as the sample of pad `id`.
    ///
    /// Returns the sample's duration in seconds.
    pub fn load_pad(&self, id: usize, path: &Path) -> Result<f32, EngineError> {
        check_pad(id)?;
        let handle = self.handle()?;

        let sample = decode_audio_file_to_sample_buffer_with_progress(
            path,
            handle.output_channels,
            handle.output_sample_rate,
            |stage, percent| {
                if stage == LoadStage::Resampling && percent < 1.0 {
                    return;
                }
                log::debug!("Pad {id}: {stage:?} {:.0}%", percent * 100.0);
            },
        )?;
        let duration_sec = sample.frames() as f32 / handle.output_sample_rate as f32;

        push(
            &handle.producer,
            ControlMessage::LoadSample { id, sample },
            "LoadSample",
        )?;
        Ok(duration_sec)
    }

    /// Load every pad of the sound bank from `dir`.
    ///
    /// A pad whose sample is missing or undecodable is logged and left
    /// silent. Returns how many pads were loaded.
    pub fn load_sound_bank(&self, dir: &Path) -> Result<usize, EngineError> {
        self.handle()?;

        let mut loaded = 0;
        for (id, entry) in SOUND_BANK.iter().enumerate() {
            let Some(path) = entry.resolve_in(dir) else {
                log::warn!(
                    "No sample for pad {} ({}) in {}: expected {}",
                    entry.key,
                    entry.id,
                    dir.display(),
                    entry.file_name()
                );
                continue;
            };

            match self.load_pad(id, &path) {
                Ok(duration_sec) => {
                    log::info!(
                        "Loaded pad {} ({}) from {} ({duration_sec:.2}s)",
                        entry.key,
                        entry.id,
                        path.display()
                    );
                    loaded += 1;
                }
                Err(err) => {
                    log::warn!("Failed to load pad {} from {}: {err}", entry.key, path.display());
                }
            }
        }

        Ok(loaded)
    }

    /// Restart pad `id` from its first frame at `volume`.
    pub fn play_pad(&self, id: usize, volume: f32) -> Result<(), EngineError> {
        check_pad(id)?;
        check_volume(volume)?;
        let handle = self.handle()?;
        push(&handle.producer, ControlMessage::PlayPad { id, volume }, "PlayPad")
    }

    /// Stop playback of all pads.
    pub fn stop_all(&self) -> Result<(), EngineError> {
        let handle = self.handle()?;
        push(&handle.producer, ControlMessage::StopAll(), "StopAll")
    }

    /// An owned playback handle for pad `id`.
    pub fn clip(&self, id: usize) -> Result<EngineClip, EngineError> {
        check_pad(id)?;
        let handle = self.handle()?;
        Ok(EngineClip::new(id, Arc::clone(&handle.producer)))
    }
}

/// Playback handle for one pad of a running [`AudioEngine`].
pub struct EngineClip {
    id: usize,
    volume: f32,
    producer: SharedProducer,
}

impl EngineClip {
    fn new(id: usize, producer: SharedProducer) -> Self {
        Self {
            id,
            volume: constants::DEFAULT_VOLUME,
            producer,
        }
    }

    pub fn pad_id(&self) -> usize {
        self.id
    }
}

impl Clip for EngineClip {
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(VOLUME_MIN, VOLUME_MAX);
    }

    fn play_from_start(&mut self) -> Result<(), EngineError> {
        check_volume(self.volume)?;
        push(
            &self.producer,
            ControlMessage::PlayPad {
                id: self.id,
                volume: self.volume,
            },
            "PlayPad",
        )
    }
}

#[cfg(test)]
mod tests {
    use cpal::traits::HostTrait;
    use rtrb::RingBuffer;

    use super::*;

    #[test]
    fn test_engine_not_running() {
        let engine = AudioEngine::new();
        assert!(!engine.is_running());
        assert!(engine.output_format().is_none());
        assert!(matches!(engine.play_pad(0, 0.5), Err(EngineError::NotRunning)));
        assert!(matches!(engine.stop_all(), Err(EngineError::NotRunning)));
        assert!(matches!(engine.clip(3), Err(EngineError::NotRunning)));
        assert!(matches!(
            engine.load_sound_bank(Path::new("samples")),
            Err(EngineError::NotRunning)
        ));
    }

    #[test]
    fn test_argument_checks_come_first() {
        let engine = AudioEngine::new();
        assert!(matches!(
            engine.play_pad(NUM_PADS, 0.5),
            Err(EngineError::PadOutOfRange { id: 9, max: 9 })
        ));
        assert!(matches!(
            engine.play_pad(0, 1.5),
            Err(EngineError::VolumeOutOfRange(_))
        ));
        assert!(matches!(
            engine.load_pad(12, Path::new("kick.wav")),
            Err(EngineError::PadOutOfRange { .. })
        ));
    }

    #[test]
    fn test_shut_down_without_run() {
        let mut engine = AudioEngine::new();
        engine.shut_down();
        assert!(!engine.is_running());
    }

    #[test]
    fn test_clip_sends_play_with_current_volume() {
        let (producer, mut consumer) = RingBuffer::new(4);
        let mut clip = EngineClip::new(5, Arc::new(Mutex::new(producer)));
        assert_eq!(clip.pad_id(), 5);

        clip.set_volume(0.3);
        clip.play_from_start().unwrap();

        match consumer.pop() {
            Ok(ControlMessage::PlayPad { id, volume }) => {
                assert_eq!(id, 5);
                assert!((volume - 0.3).abs() < f32::EPSILON);
            }
            other => panic!("unexpected message: {other:?}"),
        }
        assert!(consumer.pop().is_err());
    }

    #[test]
    fn test_clip_reports_full_queue() {
        let (producer, _consumer) = RingBuffer::new(1);
        let mut clip = EngineClip::new(0, Arc::new(Mutex::new(producer)));

        clip.play_from_start().unwrap();
        assert!(matches!(
            clip.play_from_start(),
            Err(EngineError::QueueFull("PlayPad"))
        ));
    }

    #[test]
    fn test_run_and_play_with_hardware() {
        if cpal::default_host().default_output_device().is_none() {
            return;
        }

        let mut engine = AudioEngine::new();
        if engine.run().is_err() {
            return;
        }

        assert!(matches!(engine.run(), Err(EngineError::AlreadyRunning)));
        assert!(engine.play_pad(0, 0.5).is_ok());
        assert!(engine.clip(8).is_ok());
        engine.shut_down();
        assert!(!engine.is_running());
    }
}
