use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::any,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::store::BackendSlot;

#[derive(Debug, Deserialize)]
struct SetBackendRequest {
    backend_url: String,
}

#[derive(Debug, Serialize)]
struct SetBackendResponse {
    status: &'static str,
    backend_url: String,
}

#[derive(Debug, Serialize)]
struct GetBackendResponse {
    backend_url: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Create the single-endpoint registry router.
///
/// `POST /` sets the backend URL, `GET /` retrieves it (404 while unset),
/// anything else is 405. Invalid JSON on POST is a 400, matching the relay
/// worker this service replaces.
pub fn create_registry_router(slot: Arc<BackendSlot>) -> Router {
    Router::new()
        .route("/", any(handle))
        .layer(TraceLayer::new_for_http())
        .with_state(slot)
}

async fn handle(State(slot): State<Arc<BackendSlot>>, method: Method, body: String) -> Response {
    if method == Method::POST {
        return match serde_json::from_str::<SetBackendRequest>(&body) {
            Ok(req) => {
                info!("Registered backend URL: {}", req.backend_url);
                slot.set(req.backend_url.clone()).await;
                (
                    StatusCode::OK,
                    Json(SetBackendResponse {
                        status: "ok",
                        backend_url: req.backend_url,
                    }),
                )
                    .into_response()
            }
            Err(_) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Invalid JSON".to_string(),
                }),
            )
                .into_response(),
        };
    }

    if method == Method::GET {
        return match slot.get().await {
            Some(backend_url) => {
                (StatusCode::OK, Json(GetBackendResponse { backend_url })).into_response()
            }
            None => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "backend_url not set".to_string(),
                }),
            )
                .into_response(),
        };
    }

    (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response()
}
