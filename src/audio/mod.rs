//! In-memory audio plus the file formats and conversions the fixture pipelines need.
//!
//! Samples are kept planar: one `Vec<f32>` per channel, all of equal length, in `[-1.0, 1.0]`.

pub mod decode;
pub mod resample;
pub mod wav_io;

use crate::error::AppError;

#[derive(Clone, Debug, PartialEq)]
pub struct AudioSegment {
    samples: Vec<Vec<f32>>,
    sample_rate: u32,
}

/// Number of frames covering `duration_ms` at `sample_rate`, rounded to the nearest frame.
pub fn frames_for_duration(duration_ms: u64, sample_rate: u32) -> usize {
    ((duration_ms as u128 * sample_rate as u128 + 500) / 1000) as usize
}

impl AudioSegment {
    pub fn new(samples: Vec<Vec<f32>>, sample_rate: u32) -> Result<AudioSegment, AppError> {
        if samples.is_empty() {
            return Err(AppError::InvalidAudio(String::from("no audio channels")));
        }
        if sample_rate == 0 {
            return Err(AppError::InvalidAudio(String::from("sample rate must be non-zero")));
        }
        let len = samples[0].len();
        if samples.iter().any(|channel| channel.len() != len) {
            return Err(AppError::InvalidAudio(String::from("channel length mismatch")));
        }
        Ok(AudioSegment {
            samples,
            sample_rate,
        })
    }

    pub fn silent(duration_ms: u64, sample_rate: u32, channels: usize) -> Result<AudioSegment, AppError> {
        let frames = frames_for_duration(duration_ms, sample_rate);
        Self::new(vec![vec![0.0; frames]; channels], sample_rate)
    }

    pub fn samples(&self) -> &[Vec<f32>] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<Vec<f32>> {
        self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.samples.len()
    }

    pub fn frames(&self) -> usize {
        self.samples[0].len()
    }

    /// Duration rounded to the nearest millisecond.
    pub fn duration_ms(&self) -> u64 {
        ((self.frames() as u128 * 1000 + self.sample_rate as u128 / 2) / self.sample_rate as u128) as u64
    }

    pub fn append(&mut self, other: AudioSegment) -> Result<(), AppError> {
        if other.sample_rate != self.sample_rate || other.channels() != self.channels() {
            return Err(AppError::InvalidAudio(format!(
                "cannot append {}ch/{}Hz audio to {}ch/{}Hz audio",
                other.channels(),
                other.sample_rate,
                self.channels(),
                self.sample_rate
            )));
        }
        for (channel, tail) in self.samples.iter_mut().zip(other.samples) {
            channel.extend(tail);
        }
        Ok(())
    }

    pub fn truncate_frames(&mut self, frames: usize) {
        for channel in &mut self.samples {
            channel.truncate(frames);
        }
    }

    /// Averages down to mono or duplicates mono out to `channels`.
    pub fn set_channels(self, channels: usize) -> Result<AudioSegment, AppError> {
        let from_channels = self.channels();
        if from_channels == channels {
            return Ok(self);
        }
        let sample_rate = self.sample_rate;
        if channels == 1 {
            let mut mixed = vec![0.0_f32; self.frames()];
            for channel in &self.samples {
                for (acc, value) in mixed.iter_mut().zip(channel) {
                    *acc += *value;
                }
            }
            let scale = 1.0 / from_channels as f32;
            for value in &mut mixed {
                *value *= scale;
            }
            return Self::new(vec![mixed], sample_rate);
        }
        if from_channels == 1 && channels > 1 {
            let mono = self.samples.into_iter().next().unwrap_or_default();
            return Self::new(vec![mono; channels], sample_rate);
        }
        Err(AppError::InvalidAudio(format!(
            "unsupported channel conversion from {} to {}",
            from_channels, channels
        )))
    }

    pub fn set_frame_rate(self, sample_rate: u32) -> Result<AudioSegment, AppError> {
        if sample_rate == self.sample_rate {
            return Ok(self);
        }
        let from_rate = self.sample_rate;
        let resampled = resample::resample(&self.samples, from_rate, sample_rate)?;
        Self::new(resampled, sample_rate)
    }

    /// Pads with silence or truncates so the segment lasts exactly `duration_ms`.
    pub fn fit_to_duration(mut self, duration_ms: u64) -> Result<AudioSegment, AppError> {
        let target = frames_for_duration(duration_ms, self.sample_rate);
        let frames = self.frames();
        if frames < target {
            debug!("Padding {} frames of silence", target - frames);
            let silence = Self::new(vec![vec![0.0; target - frames]; self.channels()], self.sample_rate)?;
            self.append(silence)?;
        } else {
            debug!("Trimming {} frames", frames - target);
            self.truncate_frames(target);
        }
        Ok(self)
    }
}
