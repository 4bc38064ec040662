use anyhow::Context;
use patient_server::config::{Config, Storage, DEFAULT_LOG_FILTER};
use patient_server::{app, seed, AppState, MemoryStore, PatientStore, SqliteStore};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    match &config.storage {
        Storage::Memory => serve(MemoryStore::new(), &config).await,
        Storage::SqliteMemory => serve(SqliteStore::open_in_memory()?, &config).await,
        Storage::SqliteFile(path) => {
            let store = SqliteStore::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            serve(store, &config).await
        }
    }
}

async fn serve<S: PatientStore>(store: S, config: &Config) -> anyhow::Result<()> {
    tracing::info!(storage = ?config.storage, "connected to patient store");

    let dataset = seed::load_dataset(config.seed_file.as_deref())?;
    seed::bootstrap(&store, &dataset)
        .await
        .context("failed to seed patient data")?;

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!("server running at http://{}", config.addr);

    axum::serve(listener, app(AppState::new(store)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
