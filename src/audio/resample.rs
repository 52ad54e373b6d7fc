use crate::error::AppError;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

const SINC_LEN: usize = 256;

/// Converts every channel from `from_rate` to `to_rate`.
///
/// The signal plus `2 * SINC_LEN` frames of trailing silence goes through the sinc filter in one
/// chunk, so even inputs shorter than the filter reach its output. The filter delay is then
/// dropped and the output has `ceil(frames * to_rate / from_rate)` frames aligned with the input.
pub fn resample(samples: &[Vec<f32>], from_rate: u32, to_rate: u32) -> Result<Vec<Vec<f32>>, AppError> {
    if from_rate == to_rate || samples.is_empty() || samples[0].is_empty() {
        return Ok(samples.to_vec());
    }

    let channels = samples.len();
    let input_len = samples[0].len();
    let ratio = to_rate as f64 / from_rate as f64;
    let expected_len =
        ((input_len as u64 * to_rate as u64 + from_rate as u64 - 1) / from_rate as u64) as usize;
    let padded: Vec<Vec<f32>> = samples
        .iter()
        .map(|channel| {
            let mut channel = channel.clone();
            channel.resize(input_len + 2 * SINC_LEN, 0.0);
            channel
        })
        .collect();
    let params = SincInterpolationParameters {
        sinc_len: SINC_LEN,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, padded[0].len(), channels)?;
    let delay = resampler.output_delay();

    let mut output = resampler.process(&padded, None)?;
    while output[0].len() < delay + expected_len {
        let tail = resampler.process_partial(None::<&[Vec<f32>]>, None)?;
        if tail[0].is_empty() {
            break;
        }
        for (channel, rest) in output.iter_mut().zip(tail) {
            channel.extend(rest);
        }
    }

    for channel in &mut output {
        channel.drain(..delay.min(channel.len()));
        channel.resize(expected_len, 0.0);
    }
    debug!(
        "Resampled {} frames at {}Hz to {} frames at {}Hz",
        input_len, from_rate, expected_len, to_rate
    );
    Ok(output)
}
