//! Audio file loading and decoding functionality.
//!
//! Pad samples are decoded once, converted to the output rate and channel
//! layout, and handed to the real-time mixer as immutable shared buffers.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use symphonia::core::{
    audio::SampleBuffer as SymphoniaSampleBuffer, codecs::DecoderOptions,
    errors::Error as SymphoniaError, formats::FormatOptions, io::MediaSourceStream,
    meta::MetadataOptions, probe::Hint,
};
use symphonia::default::{get_codecs, get_probe};

use crate::audio_engine::channels::map_channels;
use crate::audio_engine::errors::SampleLoadError;
use crate::audio_engine::resample::{deinterleave, interleave, resample_planar};
use crate::messages::SampleBuffer;

/// Stage reported through the progress callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    Decoding,
    Resampling,
    ChannelMapping,
}

/// Decodes an audio file into a sample buffer with the specified output configuration.
///
/// # Errors
///
/// - File not found or cannot be opened
/// - Audio format not recognized or corrupted
/// - Unsupported channel layout
pub fn decode_audio_file_to_sample_buffer(
    path: &Path,
    output_channels: usize,
    output_rate_hz: u32,
) -> Result<SampleBuffer, SampleLoadError> {
    decode_audio_file_to_sample_buffer_with_progress(
        path,
        output_channels,
        output_rate_hz,
        |_, _| {},
    )
}

/// Same as [`decode_audio_file_to_sample_buffer`], reporting each stage's
/// completion fraction to `on_progress`.
pub fn decode_audio_file_to_sample_buffer_with_progress(
    path: &Path,
    output_channels: usize,
    output_rate_hz: u32,
    mut on_progress: impl FnMut(LoadStage, f32),
) -> Result<SampleBuffer, SampleLoadError> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or(SampleLoadError::NoDefaultTrack)?;
    let track_id = track.id;
    let file_rate_hz = track
        .codec_params
        .sample_rate
        .ok_or(SampleLoadError::MissingSampleRate)?;
    let file_channels = track
        .codec_params
        .channels
        .ok_or(SampleLoadError::MissingChannels)?
        .count();

    let mut decoder = get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    on_progress(LoadStage::Decoding, 0.0);
    let mut decoded: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(err) => return Err(SampleLoadError::Decode(err)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let audio_buf = match decoder.decode(&packet) {
            Ok(buf) => buf,
            // Corrupt frames are skipped.
            Err(SymphoniaError::DecodeError(msg)) => {
                log::debug!("Skipping undecodable packet in {}: {msg}", path.display());
                continue;
            }
            Err(err) => return Err(SampleLoadError::Decode(err)),
        };
        let spec = *audio_buf.spec();
        let duration = audio_buf.capacity() as u64;

        let mut sample_buf = SymphoniaSampleBuffer::<f32>::new(duration, spec);
        sample_buf.copy_interleaved_ref(audio_buf);
        decoded.extend_from_slice(sample_buf.samples());
    }
    on_progress(LoadStage::Decoding, 1.0);

    let resampled = if file_rate_hz == output_rate_hz {
        on_progress(LoadStage::Resampling, 1.0);
        decoded
    } else {
        let planar = deinterleave(&decoded, file_channels);
        let planar = resample_planar(planar, file_rate_hz, output_rate_hz, |p| {
            on_progress(LoadStage::Resampling, p)
        })?;
        interleave(&planar)
    };

    let mapped = map_channels(resampled, file_channels, output_channels)?;
    on_progress(LoadStage::ChannelMapping, 1.0);

    Ok(SampleBuffer {
        channels: output_channels,
        samples: Arc::from(mapped.into_boxed_slice()),
    })
}
