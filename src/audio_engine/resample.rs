//! One-shot sample rate conversion for decoded pad samples.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::audio_engine::constants::RESAMPLE_CHUNK_FRAMES;
use crate::audio_engine::errors::SampleLoadError;

/// Splits interleaved samples into one vector per channel.
pub fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let mut planar = vec![Vec::with_capacity(samples.len() / channels.max(1)); channels];
    for frame in samples.chunks_exact(channels) {
        for (channel, sample) in frame.iter().enumerate() {
            planar[channel].push(*sample);
        }
    }
    planar
}

/// Joins per-channel vectors back into interleaved frames.
pub fn interleave(planar: &[Vec<f32>]) -> Vec<f32> {
    let frames = planar.iter().map(Vec::len).min().unwrap_or(0);
    let mut out = Vec::with_capacity(frames * planar.len());
    for frame in 0..frames {
        for channel in planar {
            out.push(channel[frame]);
        }
    }
    out
}

fn append(out: &mut [Vec<f32>], block: Vec<Vec<f32>>) {
    for (dst, src) in out.iter_mut().zip(block) {
        dst.extend_from_slice(&src);
    }
}

/// Converts a whole planar buffer from `from_hz` to `to_hz`.
///
/// The resampler's output delay is trimmed off so the first output frame lines
/// up with the first input frame, and the result is cut to the exact expected
/// length. `progress` is called with the fraction of input consumed.
pub fn resample_planar(
    planar: Vec<Vec<f32>>,
    from_hz: u32,
    to_hz: u32,
    mut progress: impl FnMut(f32),
) -> Result<Vec<Vec<f32>>, SampleLoadError> {
    let frames = planar.first().map_or(0, Vec::len);
    if from_hz == to_hz || frames == 0 {
        progress(1.0);
        return Ok(planar);
    }

    let channels = planar.len();
    let ratio = to_hz as f64 / from_hz as f64;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        oversampling_factor: 128,
        interpolation: SincInterpolationType::Linear,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler =
        SincFixedIn::<f32>::new(ratio, 1.0, params, RESAMPLE_CHUNK_FRAMES, channels)?;

    let delay = resampler.output_delay();
    let expected = (frames as f64 * ratio).ceil() as usize;
    let mut out = vec![Vec::with_capacity(expected + delay); channels];

    let mut pos = 0;
    while frames - pos >= resampler.input_frames_next() {
        let n = resampler.input_frames_next();
        let chunk: Vec<&[f32]> = planar.iter().map(|c| &c[pos..pos + n]).collect();
        append(&mut out, resampler.process(&chunk, None)?);
        pos += n;
        progress(pos as f32 / frames as f32);
    }

    if pos < frames {
        let chunk: Vec<&[f32]> = planar.iter().map(|c| &c[pos..]).collect();
        append(&mut out, resampler.process_partial(Some(&chunk), None)?);
    }

    // Flush the filter tail until the delayed output covers the whole input.
    while out[0].len() < expected + delay {
        let block = resampler.process_partial(None::<&[Vec<f32>]>, None)?;
        if block.first().is_none_or(Vec::is_empty) {
            break;
        }
        append(&mut out, block);
    }

    for channel in &mut out {
        channel.drain(..delay.min(channel.len()));
        channel.truncate(expected);
    }
    progress(1.0);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deinterleave_interleave() {
        let interleaved = vec![1.0, -1.0, 2.0, -2.0, 3.0, -3.0];
        let planar = deinterleave(&interleaved, 2);

        assert_eq!(planar, vec![vec![1.0, 2.0, 3.0], vec![-1.0, -2.0, -3.0]]);
        assert_eq!(interleave(&planar), interleaved);
    }

    #[test]
    fn test_same_rate_is_passthrough() {
        let planar = vec![vec![0.1, 0.2, 0.3]];
        let out = resample_planar(planar.clone(), 44_100, 44_100, |_| {}).unwrap();
        assert_eq!(out, planar);
    }

    #[test]
    fn test_upsample_length() {
        let planar = vec![vec![0.25; 4410], vec![-0.25; 4410]];
        let mut last = 0.0;
        let out = resample_planar(planar, 44_100, 48_000, |p| last = p).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].len(), 4800);
        assert_eq!(out[1].len(), 4800);
        assert!((last - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_downsample_preserves_dc_level() {
        let planar = vec![vec![0.5; 9600]];
        let out = resample_planar(planar, 48_000, 24_000, |_| {}).unwrap();

        assert_eq!(out[0].len(), 4800);
        // Away from the edges a constant signal stays constant.
        let middle = &out[0][1000..3800];
        assert!(middle.iter().all(|s| (s - 0.5).abs() < 0.02));
    }
}
