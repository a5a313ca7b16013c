use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::api::{create_router, AppState};
use folio::config::Config;
use folio::embeddings::EmbeddingProvider;
use folio::llm::LlmProvider;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio backend with a retrieval-augmented chat widget")]
struct Args {
    /// Regenerate every content and project embedding, then exit
    #[arg(long)]
    reembed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if config.server.api_keys.is_empty() {
        tracing::warn!(
            "FOLIO_API_KEYS is not set. Admin endpoints under /api/v1/admin are open to anyone."
        );
    }

    tracing::info!("Connecting to backend...");
    let db = folio::db::connect(&config.backend)?;

    tracing::info!("Initializing embedding provider: {}...", config.embeddings.model);
    let embeddings = EmbeddingProvider::new(&config.embeddings)?;
    if !embeddings.is_available() {
        tracing::warn!("Embeddings unavailable - semantic retrieval will find nothing");
    }

    if let Some(llm_config) = &config.llm {
        tracing::info!("Initializing LLM provider: {}...", llm_config.model);
    }
    let llm = LlmProvider::new(config.llm.as_ref());
    if !llm.is_available() {
        tracing::warn!("LLM unavailable - grounded replies will use fixed fallbacks");
    }

    let state = AppState::new(config.clone(), db, embeddings, llm);

    if args.reembed {
        tracing::info!("Regenerating embeddings...");
        let summary = state.catalog.reembed_all().await?;
        if summary.failed > 0 {
            anyhow::bail!("{} records could not be embedded", summary.failed);
        }
        return Ok(());
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Folio starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/v1/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Folio stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}
