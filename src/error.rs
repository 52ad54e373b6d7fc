use std::{io::Error as IoError, path::PathBuf};
use thiserror::Error;
use toml::de::Error as TomlDeserializationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("File not Found: {0}\n{1:#?}")]
    FileNotFound(PathBuf, IoError),
    #[error("Failed to deserialize config file: {0}\n{1:#?}")]
    ConfigDeserializationError(PathBuf, TomlDeserializationError),
    #[error("Failed to spawn {0}\n{1:#?}")]
    CommandSpawnError(String, IoError),
    #[error("Non-zero exit code ({2:?})\nStdout: {0:#?}\nStderr: {1:#?}")]
    CommandError(String, String, Option<i32>),
    #[error("IO Error: {0:#?}")]
    IoError(#[from] IoError),
    #[error("HTTP Error: {0:#?}")]
    HttpError(#[from] reqwest::Error),
    #[error("Remote synthesis failed with status {0}\nBody: {1:#?}")]
    HttpStatusError(u16, String),
    #[error("Invalid URL: {0:#?}")]
    UrlError(#[from] url::ParseError),
    #[error("Decode Error: {0:#?}")]
    DecodeError(#[from] symphonia::core::errors::Error),
    #[error("Failed to construct resampler: {0:#?}")]
    ResamplerConstructionError(#[from] rubato::ResamplerConstructionError),
    #[error("Resample Error: {0:#?}")]
    ResampleError(#[from] rubato::ResampleError),
    #[error("Invalid audio: {0}")]
    InvalidAudio(String),
    #[error("Unsupported language tag: {0:?}")]
    UnsupportedLanguage(String),
    #[error("Text to synthesize is empty")]
    EmptyText(),
}
