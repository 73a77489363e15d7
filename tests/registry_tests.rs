// Integration tests for the backend-URL registry worker
//
// The router runs on an ephemeral port and is exercised over real HTTP,
// including through the RegistryClient used by the app.

use anyhow::Result;
use std::sync::Arc;

use avatar_chat::registry::{create_registry_router, BackendSlot, RegistryClient};

async fn spawn_registry() -> Result<String> {
    let slot = Arc::new(BackendSlot::new());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let _ = axum::serve(listener, create_registry_router(slot)).await;
    });

    Ok(format!("http://{}/", addr))
}

#[tokio::test]
async fn test_get_before_set_returns_404() -> Result<()> {
    let url = spawn_registry().await?;

    let response = reqwest::get(&url).await?;
    assert_eq!(response.status(), 404);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"], "backend_url not set");
    Ok(())
}

#[tokio::test]
async fn test_post_then_get_round_trips() -> Result<()> {
    let url = spawn_registry().await?;
    let client = reqwest::Client::new();

    let response = client
        .post(&url)
        .json(&serde_json::json!({ "backend_url": "https://backend.example" }))
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend_url"], "https://backend.example");

    let response = reqwest::get(&url).await?;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["backend_url"], "https://backend.example");
    Ok(())
}

#[tokio::test]
async fn test_invalid_json_returns_400() -> Result<()> {
    let url = spawn_registry().await?;
    let client = reqwest::Client::new();

    let response = client.post(&url).body("not json at all").send().await?;
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"], "Invalid JSON");

    // A bad POST must not disturb the slot.
    let response = reqwest::get(&url).await?;
    assert_eq!(response.status(), 404);
    Ok(())
}

#[tokio::test]
async fn test_other_methods_return_405() -> Result<()> {
    let url = spawn_registry().await?;
    let client = reqwest::Client::new();

    let response = client.put(&url).body("{}").send().await?;
    assert_eq!(response.status(), 405);

    let response = client.delete(&url).send().await?;
    assert_eq!(response.status(), 405);
    Ok(())
}

#[tokio::test]
async fn test_registry_client_publish_and_fetch() -> Result<()> {
    let url = spawn_registry().await?;
    let client = RegistryClient::new(url);

    // Nothing registered yet: fetch fails with the registry's 404.
    assert!(client.fetch_backend_url().await.is_err());

    client.publish_backend_url("http://10.0.0.5:8000").await?;
    assert_eq!(client.fetch_backend_url().await?, "http://10.0.0.5:8000");

    // Publishing again overwrites the single slot.
    client.publish_backend_url("http://10.0.0.6:8000").await?;
    assert_eq!(client.fetch_backend_url().await?, "http://10.0.0.6:8000");
    Ok(())
}
