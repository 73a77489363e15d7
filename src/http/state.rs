use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::audio::CaptureSource;
use crate::chat::ChatStore;
use crate::config::Config;
use crate::stream::StreamSession;
use crate::transcript::TranscriptSink;

/// Transcription settings applied when a session starts
#[derive(Debug, Clone)]
pub struct TranscriptionSettings {
    pub backend_url: Option<String>,
    pub registry_url: Option<String>,
    pub ws_path: String,
    pub target_sample_rate: u32,
    pub buffer_samples: usize,
}

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Chat avatars and histories (in-memory only)
    pub chat: Arc<RwLock<ChatStore>>,
    /// Live transcript projection
    pub sink: Arc<TranscriptSink>,
    /// The single active streaming session, if any
    pub stream: Arc<Mutex<Option<Arc<StreamSession>>>>,
    /// Capture source used for new sessions
    pub capture_source: CaptureSource,
    pub transcription: TranscriptionSettings,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self::with_capture_source(config, CaptureSource::Microphone)
    }

    /// Build state around a specific capture source (tests use scripted
    /// buffers instead of a microphone).
    pub fn with_capture_source(config: &Config, capture_source: CaptureSource) -> Self {
        Self {
            chat: Arc::new(RwLock::new(ChatStore::new())),
            sink: Arc::new(TranscriptSink::new(config.transcription.transcript_mode)),
            stream: Arc::new(Mutex::new(None)),
            capture_source,
            transcription: TranscriptionSettings {
                backend_url: config.transcription.backend_url.clone(),
                registry_url: config.transcription.registry_url.clone(),
                ws_path: config.transcription.ws_path.clone(),
                target_sample_rate: config.transcription.target_sample_rate,
                buffer_samples: config.audio.buffer_samples,
            },
        }
    }
}

