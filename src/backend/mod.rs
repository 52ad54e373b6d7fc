pub mod espeak;
pub mod gtts;

use crate::error::AppError;
use std::{
    fs,
    io::{Read, Write},
    path::Path,
};
use tempfile::NamedTempFile;

pub trait TtsEngine
where
    Self: Sized,
{
    type Config;
    type Error: From<std::io::Error>;

    fn from_config(config: Self::Config) -> Result<Self, Self::Error>;

    /// Synthesizes `text` into an encoded audio file (WAV for local engines, MP3 for remote ones).
    fn generate(&self, text: &str) -> Result<Vec<u8>, Self::Error>;

    fn save<P: AsRef<Path>>(&self, text: &str, path: P) -> Result<(), Self::Error> {
        let buffer = self.generate(text)?;
        fs::write(path.as_ref(), &buffer)?;
        info!("TTS audio saved to {}", path.as_ref().display());
        Ok(())
    }
}

pub(crate) fn ensure_text(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        Err(AppError::EmptyText())
    } else {
        Ok(())
    }
}

/// Hands `text` to an external program through a pair of scratch files and returns whatever
/// the program wrote to the second one.
pub(crate) fn render_through_files<F>(text: &str, render: F) -> Result<Vec<u8>, AppError>
where
    F: FnOnce(&Path, &Path) -> Result<(), AppError>,
{
    ensure_text(text)?;
    let mut input_file = NamedTempFile::new()?;
    let mut output_file = NamedTempFile::new()?;

    input_file.write_all(text.as_bytes())?;
    input_file.flush()?;

    render(input_file.path(), output_file.path())?;

    let mut buffer = Vec::new();
    output_file.read_to_end(&mut buffer)?;
    if buffer.is_empty() {
        return Err(AppError::InvalidAudio(String::from("synthesizer produced no audio")));
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_reads_back_what_the_program_wrote() {
        let buffer = render_through_files("hello", |input, output| {
            let mut bytes = b"RIFF".to_vec();
            bytes.extend(fs::read(input)?);
            fs::write(output, bytes)?;
            Ok(())
        })
        .expect("render");
        assert_eq!(buffer, b"RIFFhello");
    }

    #[test]
    fn render_rejects_empty_output_and_empty_text() {
        let empty = render_through_files("hello", |_, _| Ok(()));
        assert!(matches!(empty, Err(AppError::InvalidAudio(_))));

        let mut called = false;
        let blank = render_through_files(" \t", |_, _| {
            called = true;
            Ok(())
        });
        assert!(matches!(blank, Err(AppError::EmptyText())));
        assert!(!called);
    }
}
