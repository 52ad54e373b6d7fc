use super::AudioSegment;
use crate::error::AppError;
use std::{fs::File, io::ErrorKind, path::Path};
use symphonia::core::{
    audio::SampleBuffer,
    codecs::{DecoderOptions, CODEC_TYPE_NULL},
    errors::Error as SymphoniaError,
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};

/// Decodes a compressed audio file (MP3 or any other format the probe recognises) into memory.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<AudioSegment, AppError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|track| track.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AppError::InvalidAudio(format!("no audio track in {}", path.display())))?;
    let track_id = track.id;
    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut collected = Collected::default();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(msg)) => {
                warn!("Skipping undecodable packet: {}", msg);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        collected.push(spec.rate, spec.channels.count(), buffer.samples())?;
    }

    let Collected { samples, sample_rate } = collected;
    let sample_rate = sample_rate
        .ok_or_else(|| AppError::InvalidAudio(format!("no audio decoded from {}", path.display())))?;
    debug!(
        "Decoded {} channel(s) at {}Hz from {}",
        samples.len(),
        sample_rate,
        path.display()
    );
    AudioSegment::new(samples, sample_rate)
}

/// Planar samples gathered packet by packet; the first packet fixes rate and layout.
#[derive(Debug, Default)]
struct Collected {
    samples: Vec<Vec<f32>>,
    sample_rate: Option<u32>,
}

impl Collected {
    fn push(&mut self, sample_rate: u32, channels: usize, interleaved: &[f32]) -> Result<(), AppError> {
        match self.sample_rate {
            None => {
                self.sample_rate = Some(sample_rate);
                self.samples = vec![Vec::new(); channels.max(1)];
            }
            Some(rate) if rate != sample_rate => {
                return Err(AppError::InvalidAudio(format!(
                    "sample rate changed mid-stream from {}Hz to {}Hz",
                    rate, sample_rate
                )));
            }
            Some(_) if self.samples.len() != channels => {
                return Err(AppError::InvalidAudio(String::from("channel count changed mid-stream")));
            }
            Some(_) => {}
        }
        let channels = self.samples.len();
        for (idx, value) in interleaved.iter().enumerate() {
            self.samples[idx % channels].push(*value);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{decode_file, Collected};
    use crate::error::AppError;
    use std::io::Write;

    #[test]
    fn garbage_is_a_decode_error() {
        let mut file = tempfile::Builder::new()
            .suffix(".mp3")
            .tempfile()
            .expect("tempfile");
        file.write_all(b"this is not an mp3 stream at all").expect("write");
        assert!(matches!(decode_file(file.path()), Err(AppError::DecodeError(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = decode_file(dir.path().join("missing.mp3"));
        assert!(matches!(result, Err(AppError::IoError(_))));
    }

    #[test]
    fn rate_change_mid_stream_is_rejected() {
        let mut collected = Collected::default();
        collected.push(44100, 2, &[0.1, 0.2, 0.3, 0.4]).expect("first packet");
        collected.push(44100, 2, &[0.5, 0.6]).expect("same format");
        assert_eq!(collected.samples, vec![vec![0.1, 0.3, 0.5], vec![0.2, 0.4, 0.6]]);

        let result = collected.push(48000, 2, &[0.0, 0.0]);
        assert!(matches!(result, Err(AppError::InvalidAudio(_))));
        assert_eq!(collected.samples[0].len(), 3);
    }

    #[test]
    fn channel_change_mid_stream_is_rejected() {
        let mut collected = Collected::default();
        collected.push(16000, 1, &[0.0; 4]).expect("first packet");
        assert!(collected.push(16000, 2, &[0.0; 4]).is_err());
    }
}
