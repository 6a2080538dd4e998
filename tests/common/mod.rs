#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use scheme_api::config::AppConfig;
use scheme_api::database::{MemorySchemeStore, PgSchemeStore};
use scheme_api::services::{SchemeService, SystemStamps};

pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST the given records and return the created documents.
    pub async fn create(&self, records: Value) -> Result<Vec<Value>> {
        let res = self.client.post(self.url("/schemes")).json(&records).send().await?;
        let status = res.status();
        let body = res.json::<Value>().await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create failed with {}: {}", status, body);
        let data = body["data"].as_array().context("missing data array")?;
        Ok(data.clone())
    }

    pub async fn list(&self) -> Result<Vec<Value>> {
        let res = self.client.get(self.url("/schemes")).send().await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "list failed with {}", res.status());
        let body = res.json::<Value>().await?;
        Ok(body.as_array().context("list body should be an array")?.clone())
    }
}

/// Build a scheme payload with the four client fields.
pub fn scheme(name: &str, ministry: &str) -> Value {
    json!({
        "schemename": name,
        "ministry": ministry,
        "desc": format!("{} description", name),
        "place": "India",
    })
}

/// Start the app on a free port with a fresh in-memory store.
pub async fn spawn_server() -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;

    let service = SchemeService::new(Arc::new(MemorySchemeStore::new()), Arc::new(SystemStamps::new()));
    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;
    let app = scheme_api::app(service, &config);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
    })
}

// Serialises table creation across test threads.
static MIGRATE_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

/// Connect to the database named by `DATABASE_URL` (from the environment or
/// `.env`). Returns `None` when it is not configured so callers can skip.
pub async fn pg_store() -> Result<Option<PgSchemeStore>> {
    let _ = dotenvy::dotenv();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set; skipping Postgres test");
        return Ok(None);
    }

    let _guard = MIGRATE_LOCK.lock().await;
    let store = PgSchemeStore::connect(&AppConfig::development().database)
        .await
        .context("failed to connect Postgres store")?;
    Ok(Some(store))
}

/// Name prefix unique to one test run, free of LIKE wildcards.
pub fn unique_tag() -> String {
    format!("t{}", uuid::Uuid::new_v4().simple())
}
