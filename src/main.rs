use anyhow::Result;
use avatar_chat::{create_router, AppState, Config};
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "avatar-chat",
    about = "Headless avatar chat service with live transcription streaming"
)]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/avatar-chat")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v0.1.0", cfg.service.name);
    if let Some(registry) = &cfg.transcription.registry_url {
        info!("Backend resolution via registry: {}", registry);
    }

    let state = AppState::new(&cfg);
    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
