use anyhow::Result;
use serde::Deserialize;

use crate::transcript::TranscriptMode;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct AudioConfig {
    /// Samples per buffer delivered by the capture graph
    #[serde(default = "default_buffer_samples")]
    pub buffer_samples: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            buffer_samples: default_buffer_samples(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TranscriptionConfig {
    /// Direct transcription backend URL; overrides registry lookup when set
    #[serde(default)]
    pub backend_url: Option<String>,
    /// Registry worker URL used to resolve the backend when no direct URL
    /// is configured
    #[serde(default)]
    pub registry_url: Option<String>,
    /// Path of the streaming endpoint on the backend
    #[serde(default = "default_ws_path")]
    pub ws_path: String,
    /// Wire sample rate for outbound PCM16 frames
    #[serde(default = "default_target_sample_rate")]
    pub target_sample_rate: u32,
    /// How delivered transcripts fold into the current display value
    #[serde(default)]
    pub transcript_mode: TranscriptMode,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            registry_url: None,
            ws_path: default_ws_path(),
            target_sample_rate: default_target_sample_rate(),
            transcript_mode: TranscriptMode::default(),
        }
    }
}

fn default_buffer_samples() -> usize {
    4096
}

fn default_ws_path() -> String {
    "/transcription/ws".to_string()
}

fn default_target_sample_rate() -> u32 {
    16000
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
