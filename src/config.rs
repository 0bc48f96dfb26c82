use anyhow::Result;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub audio: AudioConfig,
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base address prefixed onto every request path
    pub base_url: String,
    /// Default request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.homework-tutor.com".to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Hard cap on a single voice recording
    pub max_duration_ms: u64,
    pub sample_rate: u32,
    pub channels: u16,
    pub encode_bit_rate: u32,
    /// Container format handed to the recorder ("mp3", "aac", "wav")
    pub format: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            max_duration_ms: 60_000, // 1 minute per voice turn
            sample_rate: 16_000,
            channels: 1,
            encode_bit_rate: 96_000,
            format: "mp3".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Photo quality requested from the camera ("low", "normal", "high")
    pub photo_quality: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            photo_quality: "high".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Load from `path`, falling back to built-in defaults when the file is
    /// missing or malformed.
    pub fn load_or_default(path: &str) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config from {}: {} (using defaults)", path, e);
                Self::default()
            }
        }
    }
}
