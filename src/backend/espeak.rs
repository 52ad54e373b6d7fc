use super::{render_through_files, TtsEngine};
use crate::{config::EspeakConfig, error::AppError};

/// Local synthesis through the `espeak-ng` executable.
pub struct Espeak {
    config: EspeakConfig,
}

impl TtsEngine for Espeak {
    type Config = EspeakConfig;
    type Error = AppError;

    fn from_config(config: EspeakConfig) -> Result<Espeak, AppError> {
        Ok(Self { config })
    }

    fn generate(&self, text: &str) -> Result<Vec<u8>, AppError> {
        let buffer = render_through_files(text, |input, output| self.config.execute(input, output))?;
        debug!("espeak-ng produced {} bytes", buffer.len());
        Ok(buffer)
    }
}
