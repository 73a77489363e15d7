use super::state::AppState;
use crate::audio::{encode_wav_pcm16, PermissionDenied};
use crate::chat::{Avatar, ChatMessage, MessageKind, UploadedFile};
use crate::registry::RegistryClient;
use crate::stream::{StreamConfig, StreamSession, StreamState, StreamStats};
use crate::transport::websocket_url;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateAvatarRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PostMessageRequest {
    Text {
        content: String,
    },
    Voice {
        /// Pre-encoded WAV, base64
        wav_base64: Option<String>,
        /// Raw PCM16 samples to encode server-side
        samples: Option<Vec<i16>>,
        sample_rate: Option<u32>,
    },
    Files {
        files: Vec<UploadedFile>,
    },
}

#[derive(Debug, Serialize)]
pub struct PostMessageResponse {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct StartStreamResponse {
    pub status: String,
    pub endpoint: String,
}

#[derive(Debug, Serialize)]
pub struct StopStreamResponse {
    pub status: String,
    pub stats: Option<StreamStats>,
}

#[derive(Debug, Serialize)]
pub struct LatestTranscriptResponse {
    /// Current ticker text (placeholder included)
    pub display: String,
    /// Latest delivered transcript, if any speech has been recognized
    pub transcript: Option<String>,
    pub stats: Option<StreamStats>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> axum::response::Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

// ============================================================================
// Avatar Handlers
// ============================================================================

/// POST /avatars
pub async fn create_avatar(
    State(state): State<AppState>,
    Json(req): Json<CreateAvatarRequest>,
) -> impl IntoResponse {
    if req.name.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Avatar name must not be empty");
    }

    let avatar = state
        .chat
        .write()
        .await
        .create_avatar(req.name.trim(), req.description);

    (StatusCode::OK, Json(avatar)).into_response()
}

/// GET /avatars
pub async fn list_avatars(State(state): State<AppState>) -> impl IntoResponse {
    let avatars: Vec<Avatar> = state.chat.read().await.list_avatars();
    (StatusCode::OK, Json(avatars)).into_response()
}

/// DELETE /avatars/:avatar_id
pub async fn delete_avatar(
    State(state): State<AppState>,
    Path(avatar_id): Path<Uuid>,
) -> impl IntoResponse {
    if state.chat.write().await.delete_avatar(avatar_id) {
        (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "deleted" })),
        )
            .into_response()
    } else {
        error_response(
            StatusCode::NOT_FOUND,
            format!("Avatar {} not found", avatar_id),
        )
    }
}

// ============================================================================
// Message Handlers
// ============================================================================

/// GET /avatars/:avatar_id/messages
pub async fn get_messages(
    State(state): State<AppState>,
    Path(avatar_id): Path<Uuid>,
) -> impl IntoResponse {
    let chat = state.chat.read().await;
    match chat.messages(avatar_id) {
        Some(messages) => (StatusCode::OK, Json(messages.to_vec())).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("Avatar {} not found", avatar_id),
        ),
    }
}

/// POST /avatars/:avatar_id/messages
///
/// Appends the user message and the avatar's stub reply (uploads append a
/// system notice instead).
pub async fn post_message(
    State(state): State<AppState>,
    Path(avatar_id): Path<Uuid>,
    Json(req): Json<PostMessageRequest>,
) -> impl IntoResponse {
    let mut chat = state.chat.write().await;

    let appended = match req {
        PostMessageRequest::Text { content } => {
            let content = content.trim().to_string();
            if content.is_empty() {
                return error_response(StatusCode::BAD_REQUEST, "Message must not be empty");
            }
            chat.post_message(avatar_id, content, MessageKind::Text)
                .map(|(message, reply)| vec![message, reply])
        }

        PostMessageRequest::Voice {
            wav_base64,
            samples,
            sample_rate,
        } => {
            let wav_base64 = match (wav_base64, samples) {
                (Some(encoded), _) => encoded,
                (None, Some(samples)) => {
                    match encode_wav_pcm16(&samples, sample_rate.unwrap_or(16000)) {
                        Ok(bytes) => base64::engine::general_purpose::STANDARD.encode(bytes),
                        Err(e) => {
                            error!("Failed to encode voice note: {}", e);
                            return error_response(
                                StatusCode::INTERNAL_SERVER_ERROR,
                                format!("Failed to encode voice note: {}", e),
                            );
                        }
                    }
                }
                (None, None) => {
                    return error_response(
                        StatusCode::BAD_REQUEST,
                        "Voice message needs wav_base64 or samples",
                    );
                }
            };

            chat.post_message(
                avatar_id,
                "[Voice Message]",
                MessageKind::Voice { wav_base64 },
            )
            .map(|(message, reply)| vec![message, reply])
        }

        PostMessageRequest::Files { files } => {
            if files.is_empty() {
                return error_response(StatusCode::BAD_REQUEST, "No files in upload");
            }
            chat.upload_files(avatar_id, files).map(|notice| vec![notice])
        }
    };

    match appended {
        Some(messages) => (StatusCode::OK, Json(PostMessageResponse { messages })).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("Avatar {} not found", avatar_id),
        ),
    }
}

// ============================================================================
// Transcription Handlers
// ============================================================================

/// POST /transcription/start
///
/// Starts the single streaming session. 409 while one is already live, so
/// two microphone handles are never open at once.
pub async fn start_transcription(State(state): State<AppState>) -> impl IntoResponse {
    let mut slot = state.stream.lock().await;

    if let Some(session) = slot.as_ref() {
        let current = session.state().await;
        if matches!(current, StreamState::Connecting | StreamState::Open) {
            return error_response(StatusCode::CONFLICT, "Transcription is already running");
        }
    }

    // Resolve the endpoint: direct configuration wins, else ask the registry.
    let backend_url = match (
        &state.transcription.backend_url,
        &state.transcription.registry_url,
    ) {
        (Some(url), _) => url.clone(),
        (None, Some(registry)) => {
            match RegistryClient::new(registry.clone()).fetch_backend_url().await {
                Ok(url) => url,
                Err(e) => {
                    error!("Failed to resolve backend URL: {:#}", e);
                    return error_response(
                        StatusCode::BAD_GATEWAY,
                        format!("Failed to resolve backend URL: {}", e),
                    );
                }
            }
        }
        (None, None) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "No transcription backend configured",
            );
        }
    };

    let endpoint = match websocket_url(&backend_url, &state.transcription.ws_path) {
        Ok(url) => url.to_string(),
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, format!("{}", e));
        }
    };

    let session = Arc::new(StreamSession::new(
        StreamConfig {
            endpoint: endpoint.clone(),
            target_sample_rate: state.transcription.target_sample_rate,
            buffer_samples: state.transcription.buffer_samples,
        },
        state.capture_source.clone(),
        Arc::clone(&state.sink),
    ));

    if let Err(e) = session.start().await {
        error!("Failed to start transcription: {:#}", e);
        let status = if e
            .chain()
            .any(|cause| cause.downcast_ref::<PermissionDenied>().is_some())
        {
            StatusCode::FORBIDDEN
        } else {
            StatusCode::BAD_GATEWAY
        };
        return error_response(status, format!("Failed to start transcription: {}", e));
    }

    *slot = Some(session);
    info!("Transcription streaming started: {}", endpoint);

    (
        StatusCode::OK,
        Json(StartStreamResponse {
            status: "streaming".to_string(),
            endpoint,
        }),
    )
        .into_response()
}

/// POST /transcription/stop
///
/// Stopping with no active session is a no-op.
pub async fn stop_transcription(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.stream.lock().await.take();

    match session {
        Some(session) => {
            if let Err(e) = session.stop().await {
                error!("Failed to stop transcription: {:#}", e);
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to stop transcription: {}", e),
                );
            }
            let stats = session.stats().await;
            (
                StatusCode::OK,
                Json(StopStreamResponse {
                    status: "stopped".to_string(),
                    stats: Some(stats),
                }),
            )
                .into_response()
        }
        None => (
            StatusCode::OK,
            Json(StopStreamResponse {
                status: "idle".to_string(),
                stats: None,
            }),
        )
            .into_response(),
    }
}

/// GET /transcription/latest
pub async fn latest_transcript(State(state): State<AppState>) -> impl IntoResponse {
    let stats = match state.stream.lock().await.as_ref() {
        Some(session) => Some(session.stats().await),
        None => None,
    };

    (
        StatusCode::OK,
        Json(LatestTranscriptResponse {
            display: state.sink.latest_display(),
            transcript: state.sink.latest_transcript(),
            stats,
        }),
    )
        .into_response()
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
