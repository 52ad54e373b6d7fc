use std::{
    env, fs,
    path::{Path, PathBuf},
    process::Command,
};

use crate::error::AppError;

pub const CONFIG_PATH_ENV: &str = "SPEECH_FIXTURES_CONFIG_PATH";
pub const CONFIG_FILE_NAME: &str = "speech_fixtures.toml";

#[derive(Clone, Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub local: LocalPipelineConfig,
    pub cloud: CloudPipelineConfig,
    pub espeak: EspeakConfig,
    pub gtts: GoogleTtsConfig,
}

/// Settings for the local synthesis + resample fixture.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LocalPipelineConfig {
    pub text: String,
    /// How many times `text` is repeated; three repetitions give roughly six seconds of speech.
    pub repeat: usize,
    pub raw_output: PathBuf,
    pub output: PathBuf,
    pub target_sample_rate: u32,
}

impl Default for LocalPipelineConfig {
    fn default() -> LocalPipelineConfig {
        LocalPipelineConfig {
            text: String::from("Hello, this is a test audio generated for six seconds duration. "),
            repeat: 3,
            raw_output: PathBuf::from("test_speech_6sec_raw.wav"),
            output: PathBuf::from("test_speech_6sec_16k.wav"),
            target_sample_rate: 16000,
        }
    }
}

impl LocalPipelineConfig {
    pub fn prompt(&self) -> String {
        self.text.repeat(self.repeat.max(1))
    }
}

/// Settings for the cloud synthesis + fixed duration fixture.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CloudPipelineConfig {
    pub text: String,
    pub compressed_output: PathBuf,
    pub output: PathBuf,
    pub target_sample_rate: u32,
    pub target_channels: usize,
    pub target_duration_ms: u64,
}

impl Default for CloudPipelineConfig {
    fn default() -> CloudPipelineConfig {
        CloudPipelineConfig {
            text: String::from(
                "नमस्ते, यह एक छह सेकंड का परीक्षण ऑडियो है जो हिंदी भाषा में है। कृपया इसे सुने और पहचानें।",
            ),
            compressed_output: PathBuf::from("hindi_tts.mp3"),
            output: PathBuf::from("hindi_test_6sec_16k.wav"),
            target_sample_rate: 16000,
            target_channels: 1,
            target_duration_ms: 6000,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Default)]
#[serde(default)]
pub struct EspeakConfig {
    pub voice: Option<String>,
    /// Words per minute.
    pub speed: Option<u32>,
    /// 0-99, 50 is the engine default.
    pub pitch: Option<u32>,
    /// 0-200, 100 is the engine default.
    pub amplitude: Option<u32>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GoogleTtsConfig {
    pub endpoint: String,
    pub lang: String,
    pub slow: bool,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for GoogleTtsConfig {
    fn default() -> GoogleTtsConfig {
        GoogleTtsConfig {
            endpoint: String::from("https://translate.google.com/translate_tts"),
            lang: String::from("hi"),
            slow: false,
            timeout_secs: 30,
            user_agent: String::from(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36",
            ),
        }
    }
}

impl Config {
    pub fn from_config() -> Result<Config, AppError> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            return Self::from_file(PathBuf::from(path).join(CONFIG_FILE_NAME));
        }
        match dirs::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME)) {
            Some(config_file) if config_file.exists() => Self::from_file(config_file),
            _ => {
                info!("No {} found, using built-in defaults", CONFIG_FILE_NAME);
                Ok(Config::default())
            }
        }
    }

    pub fn from_file<P: AsRef<Path>>(config_file: P) -> Result<Config, AppError> {
        let config_file = config_file.as_ref().to_path_buf();
        let config = fs::read_to_string(&config_file)
            .map_err(|e| AppError::FileNotFound(config_file.clone(), e))?;

        let config: Config = toml::from_str(&config)
            .map_err(|e| AppError::ConfigDeserializationError(config_file.clone(), e))?;

        debug!("Loaded config from {}", config_file.display());
        Ok(config)
    }
}

impl EspeakConfig {
    pub fn command<P: AsRef<Path>>(&self, input_path: P, output_path: P) -> Command {
        let mut command = Command::new("espeak-ng");
        if let Some(voice) = &self.voice {
            command.arg("-v").arg(voice);
        }
        if let Some(speed) = self.speed {
            command.arg("-s").arg(format!("{}", speed));
        }
        if let Some(pitch) = self.pitch {
            command.arg("-p").arg(format!("{}", pitch.min(99)));
        }
        if let Some(amplitude) = self.amplitude {
            command.arg("-a").arg(format!("{}", amplitude.min(200)));
        }
        command
            .arg("-w")
            .arg(output_path.as_ref())
            .arg("-f")
            .arg(input_path.as_ref());
        command
    }

    pub fn execute<P: AsRef<Path>>(&self, input_path: P, output_path: P) -> Result<(), AppError> {
        run(self.command(input_path, output_path))
    }
}

fn run(mut command: Command) -> Result<(), AppError> {
    let program = command.get_program().to_string_lossy().into_owned();
    debug!("Running {:?}", command);
    let output = command
        .output()
        .map_err(|e| AppError::CommandSpawnError(program, e))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(AppError::CommandError(
            String::from_utf8_lossy(&output.stdout).into(),
            String::from_utf8_lossy(&output.stderr).into(),
            output.status.code(),
        ))
    }
}
