use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use scheme_api::config::{AppConfig, StorageBackend};
use scheme_api::database::{MemorySchemeStore, PgSchemeStore, SchemeStore};
use scheme_api::services::{SchemeService, SystemStamps};

#[derive(Parser, Debug)]
#[command(name = "scheme-api")]
#[command(about = "REST API for government scheme records")]
#[command(version)]
struct ServerArgs {
    #[arg(long, help = "Bind address (overrides SCHEME_API_HOST)")]
    host: Option<String>,

    #[arg(long, short, help = "Listen port (overrides SCHEME_API_PORT / PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Storage backend: memory or postgres (overrides STORAGE_BACKEND)")]
    storage: Option<StorageBackend>,
}

impl ServerArgs {
    fn apply(self, config: &mut AppConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(storage) = self.storage {
            config.storage.backend = storage;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, APP_ENV, etc.
    let _ = dotenvy::dotenv();
    scheme_api::telemetry::init_tracing();

    let args = ServerArgs::parse();
    let mut config = scheme_api::config::config().clone();
    args.apply(&mut config);

    tracing::info!(
        "Starting Scheme API in {:?} mode with {:?} storage",
        config.environment,
        config.storage.backend
    );

    let store: Arc<dyn SchemeStore> = match config.storage.backend {
        StorageBackend::Memory => Arc::new(MemorySchemeStore::new()),
        StorageBackend::Postgres => Arc::new(
            PgSchemeStore::connect(&config.database)
                .await
                .context("failed to initialise Postgres storage")?,
        ),
    };
    let service = SchemeService::new(store, Arc::new(SystemStamps::new()));
    let app = scheme_api::app(service, &config);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Scheme API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
