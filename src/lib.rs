//! Generators for short synthetic speech clips used as audio test fixtures.
//!
//! Two independent pipelines live in [`pipeline`]:
//!
//! * [`pipeline::local`] synthesizes English speech with a local engine and resamples the
//!   waveform to a fixed rate.
//! * [`pipeline::cloud`] synthesizes Hindi speech remotely, decodes the MP3, converts it to
//!   16 kHz mono and pads or trims it to exactly six seconds.

#![warn(clippy::all)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod audio;
pub mod backend;
pub mod config;
pub mod error;
pub mod pipeline;

pub use audio::AudioSegment;
pub use config::Config;
pub use error::AppError;
pub use pipeline::FixtureReport;
