use anyhow::Result;
use avatar_chat::registry::{create_registry_router, BackendSlot};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

/// Single-slot backend-URL relay worker
#[derive(Parser)]
#[command(name = "backend-registry")]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,
    #[arg(long, default_value_t = 8787)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let slot = Arc::new(BackendSlot::new());

    let addr = format!("{}:{}", args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Backend registry listening on {}", addr);

    axum::serve(listener, create_registry_router(slot)).await?;

    Ok(())
}
