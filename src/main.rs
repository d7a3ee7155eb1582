use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use anime_rater::api::{create_router, AppState};
use anime_rater::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "anime_rater=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let upstream = config.upstream_base();
    if upstream.is_none() {
        tracing::warn!("API_BASE is not set; /api/proxy requests will fail");
    }

    // Initialize application state
    let state = AppState::new(upstream, &config.catalog_path);

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, catalog = %config.catalog_path, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
