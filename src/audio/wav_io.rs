use super::AudioSegment;
use crate::error::AppError;
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};
use wav::{bit_depth::BitDepth, Header};

const WAV_FORMAT_PCM: u16 = 0x01;

/// A waveform file exactly as stored on disk: header plus the raw sample track.
#[derive(Clone, Debug)]
pub struct WavFile {
    pub header: Header,
    pub track: BitDepth,
}

impl WavFile {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<WavFile, AppError> {
        let mut reader = BufReader::new(File::open(path)?);
        let (header, track) = wav::read(&mut reader)?;
        Ok(WavFile { header, track })
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), AppError> {
        let mut writer = BufWriter::new(File::create(path)?);
        wav::write(self.header.clone(), &self.track, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn sample_rate(&self) -> u32 {
        self.header.sampling_rate
    }

    pub fn channels(&self) -> usize {
        self.header.channel_count as usize
    }

    /// Deinterleaves the track into normalized planar samples.
    pub fn to_segment(&self) -> Result<AudioSegment, AppError> {
        let channels = self.channels();
        if channels == 0 {
            return Err(AppError::InvalidAudio(String::from("WAV header declares zero channels")));
        }
        let interleaved: Vec<f32> = match &self.track {
            BitDepth::Eight(data) => data.iter().map(|s| (*s as f32 - 128.0) / 128.0).collect(),
            BitDepth::Sixteen(data) => data.iter().map(|s| *s as f32 / 32768.0).collect(),
            BitDepth::TwentyFour(data) => data.iter().map(|s| *s as f32 / 8_388_608.0).collect(),
            BitDepth::Empty => Vec::new(),
        };

        let frames = interleaved.len() / channels;
        let mut samples = vec![Vec::with_capacity(frames); channels];
        for (idx, value) in interleaved.into_iter().take(frames * channels).enumerate() {
            samples[idx % channels].push(value);
        }
        AudioSegment::new(samples, self.sample_rate())
    }

    /// Interleaves a segment as 16-bit PCM.
    pub fn from_segment(segment: &AudioSegment) -> WavFile {
        let header = Header::new(
            WAV_FORMAT_PCM,
            segment.channels() as u16,
            segment.sample_rate(),
            16,
        );
        let mut data = Vec::with_capacity(segment.frames() * segment.channels());
        for idx in 0..segment.frames() {
            for channel in segment.samples() {
                let value = channel[idx].clamp(-1.0, 1.0);
                data.push((value * i16::MAX as f32).round() as i16);
            }
        }
        WavFile {
            header,
            track: BitDepth::Sixteen(data),
        }
    }
}

pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<AudioSegment, AppError> {
    WavFile::read(path)?.to_segment()
}

pub fn write_wav<P: AsRef<Path>>(path: P, segment: &AudioSegment) -> Result<(), AppError> {
    WavFile::from_segment(segment).write(path)
}
