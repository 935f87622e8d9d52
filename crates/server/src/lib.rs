//! Serving collaborator: answers search, download/preview and snapshot
//! requests against the in-memory catalog cache.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::routing::get;
use axum::Router;
use tracing::info;

use tuankb_core::config::AppConfig;

pub mod routes;
pub mod state;

pub use state::SnapshotCache;

pub struct AppState {
    pub cache: SnapshotCache,
    /// Served document root; downloads must resolve inside it.
    pub root: PathBuf,
    pub base_url: String,
}

impl AppState {
    pub fn from_config(cfg: &AppConfig) -> Self {
        AppState {
            cache: SnapshotCache::new(&cfg.snapshot.path),
            root: PathBuf::from(&cfg.scan.root),
            base_url: cfg.server.base_url(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/search", get(routes::search))
        .route("/api/dingtalk_search", get(routes::bot_search))
        .route("/download", get(routes::download))
        .route("/preview", get(routes::preview))
        .route("/data/kb.json", get(routes::snapshot_raw))
        .with_state(state)
}

pub async fn serve(cfg: AppConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(&cfg));
    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    info!(%addr, snapshot = %cfg.snapshot.path, "serving catalog");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
