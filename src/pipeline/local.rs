use super::FixtureReport;
use crate::{
    audio::wav_io::WavFile,
    backend::{espeak::Espeak, TtsEngine},
    config::Config,
    error::AppError,
};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResampleOutcome {
    Resampled { from: u32 },
    PassThrough,
}

/// Synthesizes `text` with `espeak-ng` into a waveform file at `path`.
pub fn synthesize<P: AsRef<Path>>(config: &Config, text: &str, path: P) -> Result<(), AppError> {
    Espeak::from_config(config.espeak.clone())?.save(text, path)
}

/// Writes `input` to `output` at `target_rate`, copying the sample data untouched when the
/// rate already matches.
pub fn resample_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    target_rate: u32,
) -> Result<ResampleOutcome, AppError> {
    let source = WavFile::read(&input)?;
    let from = source.sample_rate();
    if from != target_rate {
        info!("Resampling from {}Hz to {}Hz", from, target_rate);
        let segment = source.to_segment()?.set_frame_rate(target_rate)?;
        WavFile::from_segment(&segment).write(&output)?;
        info!("Resampled audio saved to {}", output.as_ref().display());
        Ok(ResampleOutcome::Resampled { from })
    } else {
        info!(
            "Audio already at {}Hz, copying file to {}",
            target_rate,
            output.as_ref().display()
        );
        source.write(&output)?;
        Ok(ResampleOutcome::PassThrough)
    }
}

pub fn run(config: &Config) -> Result<FixtureReport, AppError> {
    let local = &config.local;
    synthesize(config, &local.prompt(), &local.raw_output)?;
    resample_file(&local.raw_output, &local.output, local.target_sample_rate)?;

    let written = WavFile::read(&local.output)?.to_segment()?;
    Ok(FixtureReport::new(&local.output, &written))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{wav_io, AudioSegment};
    use tempfile::tempdir;

    fn tone(frames: usize, sample_rate: u32, channels: usize) -> AudioSegment {
        let channel: Vec<f32> = (0..frames)
            .map(|idx| (idx as f32 * 0.05).sin() * 0.4)
            .collect();
        AudioSegment::new(vec![channel; channels], sample_rate).expect("tone")
    }

    #[test]
    fn mismatched_rate_is_resampled_to_target() {
        let dir = tempdir().expect("tempdir");
        let raw = dir.path().join("raw.wav");
        let out = dir.path().join("out.wav");
        wav_io::write_wav(&raw, &tone(22050, 22050, 1)).expect("write raw");

        let outcome = resample_file(&raw, &out, 16000).expect("resample");
        assert_eq!(outcome, ResampleOutcome::Resampled { from: 22050 });

        let written = wav_io::read_wav(&out).expect("read out");
        assert_eq!(written.sample_rate(), 16000);
        assert_eq!(written.channels(), 1);
        assert_eq!(written.frames(), 16000);
    }

    #[test]
    fn matching_rate_is_copied_unchanged() {
        let dir = tempdir().expect("tempdir");
        let raw = dir.path().join("raw.wav");
        let out = dir.path().join("out.wav");
        wav_io::write_wav(&raw, &tone(1600, 16000, 2)).expect("write raw");

        let outcome = resample_file(&raw, &out, 16000).expect("resample");
        assert_eq!(outcome, ResampleOutcome::PassThrough);
        assert_eq!(
            std::fs::read(&raw).expect("raw bytes"),
            std::fs::read(&out).expect("out bytes")
        );
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let result = resample_file(dir.path().join("nope.wav"), dir.path().join("out.wav"), 16000);
        assert!(matches!(result, Err(AppError::IoError(_))));
    }
}
