// Integration tests for the auth collaborator client
//
// A stub auth service runs in-process: signup takes JSON, login takes the
// OAuth2 password-grant form encoding, profile and logout want a bearer
// token.

use anyhow::Result;
use axum::{
    extract::Form,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use avatar_chat::auth::{AuthProvider, HttpAuthClient};

#[derive(serde::Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

async fn spawn_auth_stub() -> Result<String> {
    let app = Router::new()
        .route(
            "/signup",
            post(|Json(body): Json<serde_json::Value>| async move {
                match body["username"].as_str() {
                    Some("taken") => (
                        StatusCode::BAD_REQUEST,
                        Json(serde_json::json!({ "detail": "username already taken" })),
                    )
                        .into_response(),
                    _ => Json(serde_json::json!({
                        "access_token": "signup-token",
                        "token_type": "bearer",
                    }))
                    .into_response(),
                }
            }),
        )
        .route(
            "/login",
            post(|Form(form): Form<LoginForm>| async move {
                if form.username == "ada" && form.password == "secret" {
                    Json(serde_json::json!({
                        "access_token": "login-token",
                        "token_type": "bearer",
                    }))
                    .into_response()
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(serde_json::json!({ "detail": "invalid credentials" })),
                    )
                        .into_response()
                }
            }),
        )
        .route(
            "/profile",
            get(|headers: HeaderMap| async move {
                match bearer_token(&headers) {
                    Some("signup-token") | Some("login-token") => Json(serde_json::json!({
                        "username": "ada",
                        "email": "ada@example.com",
                    }))
                    .into_response(),
                    _ => StatusCode::UNAUTHORIZED.into_response(),
                }
            }),
        )
        .route(
            "/logout",
            post(|headers: HeaderMap| async move {
                match bearer_token(&headers) {
                    Some(_) => StatusCode::OK.into_response(),
                    None => StatusCode::UNAUTHORIZED.into_response(),
                }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(format!("http://{}", addr))
}

#[tokio::test]
async fn test_signup_then_profile() -> Result<()> {
    let base = spawn_auth_stub().await?;
    let auth = HttpAuthClient::new(base);

    let token = auth.signup("ada", "ada@example.com", "secret").await?;
    assert_eq!(token.access_token, "signup-token");
    assert_eq!(token.token_type, "bearer");

    let profile = auth.profile(&token).await?;
    assert_eq!(profile.username, "ada");
    assert_eq!(profile.email, "ada@example.com");
    Ok(())
}

#[tokio::test]
async fn test_login_uses_form_encoding() -> Result<()> {
    let base = spawn_auth_stub().await?;
    let auth = HttpAuthClient::new(base);

    let token = auth.login("ada", "secret").await?;
    assert_eq!(token.access_token, "login-token");

    auth.logout(&token).await?;
    Ok(())
}

#[tokio::test]
async fn test_failed_credentials_surface_as_errors() -> Result<()> {
    let base = spawn_auth_stub().await?;
    let auth = HttpAuthClient::new(base);

    let err = auth.login("ada", "wrong").await.unwrap_err();
    assert!(err.to_string().contains("Login failed"));

    let err = auth
        .signup("taken", "x@example.com", "pw")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Signup failed"));
    Ok(())
}
