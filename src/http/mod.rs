//! HTTP API server for the chat frontend
//!
//! This module provides the REST surface of the application:
//! - POST /avatars, GET /avatars, DELETE /avatars/:id - avatar management
//! - GET|POST /avatars/:id/messages - chat history and stub replies
//! - POST /transcription/start|stop - control the streaming session
//! - GET /transcription/latest - current ticker text and session stats
//! - GET /health - health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::{AppState, TranscriptionSettings};
