use super::FixtureReport;
use crate::{
    audio::{decode, wav_io, AudioSegment},
    backend::{gtts::GoogleTranslateTts, TtsEngine},
    config::Config,
    error::AppError,
};
use std::path::Path;

/// Decodes a compressed file and converts it to `channels` at `sample_rate`.
pub fn transcode<P: AsRef<Path>>(
    compressed: P,
    sample_rate: u32,
    channels: usize,
) -> Result<AudioSegment, AppError> {
    let segment = decode::decode_file(compressed)?;
    debug!(
        "Converting {}ch/{}Hz to {}ch/{}Hz",
        segment.channels(),
        segment.sample_rate(),
        channels,
        sample_rate
    );
    segment.set_channels(channels)?.set_frame_rate(sample_rate)
}

/// Fits `segment` to `duration_ms` and exports it as 16-bit PCM.
pub fn normalize_and_export<P: AsRef<Path>>(
    segment: AudioSegment,
    duration_ms: u64,
    output: P,
) -> Result<FixtureReport, AppError> {
    let before = segment.duration_ms();
    let segment = segment.fit_to_duration(duration_ms)?;
    if before < duration_ms {
        info!("Padded {} ms of speech to {} ms", before, duration_ms);
    } else {
        info!("Trimmed {} ms of speech to {} ms", before, duration_ms);
    }
    wav_io::write_wav(&output, &segment)?;
    Ok(FixtureReport::new(output.as_ref(), &segment))
}

pub fn run(config: &Config) -> Result<FixtureReport, AppError> {
    let cloud = &config.cloud;
    let engine = GoogleTranslateTts::from_config(config.gtts.clone())?;
    engine.save(&cloud.text, &cloud.compressed_output)?;

    let segment = transcode(
        &cloud.compressed_output,
        cloud.target_sample_rate,
        cloud.target_channels,
    )?;
    normalize_and_export(segment, cloud.target_duration_ms, &cloud.output)
}
