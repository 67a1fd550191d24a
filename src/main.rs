use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rec_blender::api::{create_router, AppState, RequestLimits};
use rec_blender::artifacts::{load_blender, source_from_config};
use rec_blender::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rec_blender=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Tables and model are loaded once; the server never starts on partial data
    let source = source_from_config(&config).await?;
    let blender = load_blender(source.as_ref(), &config)
        .await
        .context("Failed to load recommendation artifacts")?;

    let state = AppState::new(blender, RequestLimits::from(&config));
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
