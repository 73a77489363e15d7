use serde::{Deserialize, Serialize};

/// Transcript payload received from the transcription endpoint.
///
/// The field may be absent or empty; empty text means no speech has been
/// recognized yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptPayload {
    #[serde(default)]
    pub transcript: Option<String>,
}
