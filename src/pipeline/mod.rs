//! The two fixture generators. Each is a straight line of steps that overwrites its outputs.

pub mod cloud;
pub mod local;

use crate::audio::AudioSegment;
use std::{fmt, path::PathBuf};

/// Structural description of a written fixture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixtureReport {
    pub path: PathBuf,
    pub sample_rate: u32,
    pub channels: usize,
    pub frames: usize,
}

impl FixtureReport {
    pub fn new(path: impl Into<PathBuf>, segment: &AudioSegment) -> FixtureReport {
        FixtureReport {
            path: path.into(),
            sample_rate: segment.sample_rate(),
            channels: segment.channels(),
            frames: segment.frames(),
        }
    }

    pub fn duration_ms(&self) -> u64 {
        (self.frames as u64 * 1000 + self.sample_rate as u64 / 2) / self.sample_rate.max(1) as u64
    }
}

impl fmt::Display for FixtureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} Hz, {} ch, {} ms)",
            self.path.display(),
            self.sample_rate,
            self.channels,
            self.duration_ms()
        )
    }
}
