use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memeparty::config::ServerConfig;
use memeparty::content::{ContentProvider, DirectoryProvider};
use memeparty::state::AppState;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memeparty=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Meme Party...");

    let config = ServerConfig::from_env();

    let provider = Arc::new(DirectoryProvider::new(config.templates_dir.clone()));
    for stats in provider.categories() {
        tracing::info!("Category {}: {} templates", stats.category, stats.count);
    }

    let state = Arc::new(AppState::new(provider));
    let app = memeparty::app(state, &config.static_dir);

    let addr = config.socket_addr();
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}
