use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lexdraft::{create_router, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lexdraft=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting Lexdraft legal assistant service");
    tracing::info!("Runtime mode: {}", config.runtime_mode.as_str());
    tracing::info!("Completion model: {}", config.gemini_model);
    tracing::info!("Max file size: {}MB", config.max_file_size_mb);
    tracing::info!("Upload directory: {}", config.upload_dir.display());

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let state = AppState::from_config(config)?;
    let app = create_router(state);

    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
