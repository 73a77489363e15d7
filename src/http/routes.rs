use super::handlers;
use super::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Avatars
        .route(
            "/avatars",
            post(handlers::create_avatar).get(handlers::list_avatars),
        )
        .route("/avatars/:avatar_id", delete(handlers::delete_avatar))
        // Messages
        .route(
            "/avatars/:avatar_id/messages",
            get(handlers::get_messages).post(handlers::post_message),
        )
        // Transcription control
        .route(
            "/transcription/start",
            post(handlers::start_transcription),
        )
        .route("/transcription/stop", post(handlers::stop_transcription))
        .route("/transcription/latest", get(handlers::latest_transcript))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
