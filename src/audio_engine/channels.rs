use crate::audio_engine::errors::SampleLoadError;

/// Converts interleaved samples from the file's channel layout to the output's.
///
/// Supported layouts:
/// - equal channel counts pass through untouched
/// - mono fans out to every output channel
/// - any layout folds down to mono by averaging each frame
/// - stereo feeds the first two channels of a wider output, the rest stay silent
pub fn map_channels(
    samples: Vec<f32>,
    file_channels: usize,
    output_channels: usize,
) -> Result<Vec<f32>, SampleLoadError> {
    if file_channels == output_channels {
        return Ok(samples);
    }

    let unsupported = SampleLoadError::UnsupportedChannels {
        file_channels,
        output_channels,
    };
    if file_channels == 0 || output_channels == 0 {
        return Err(unsupported);
    }

    let frames = samples.len() / file_channels;
    let mut out = Vec::with_capacity(frames * output_channels);

    match (file_channels, output_channels) {
        (1, _) => {
            for s in samples {
                out.extend(std::iter::repeat_n(s, output_channels));
            }
        }
        (_, 1) => {
            let scale = 1.0 / file_channels as f32;
            for frame in samples.chunks_exact(file_channels) {
                out.push(frame.iter().sum::<f32>() * scale);
            }
        }
        (2, n) if n > 2 => {
            for frame in samples.chunks_exact(2) {
                out.extend_from_slice(frame);
                out.extend(std::iter::repeat_n(0.0, n - 2));
            }
        }
        _ => return Err(unsupported),
    }

    Ok(out)
}
