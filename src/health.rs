//! `GET /_devgate/health` endpoint handler.
//!
//! Returns a [`HealthResponse`] JSON payload with the server version,
//! uptime, where the config came from, the active backend and rule
//! count, and cumulative request statistics.

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub config: ConfigHealth,
    pub stats: StatsResponse,
}

#[derive(Serialize, Deserialize)]
pub struct ConfigHealth {
    pub source: String,
    pub version: String,
    pub loaded_ago_seconds: u64,
    pub target: String,
    pub rules: usize,
    pub static_dir: Option<PathBuf>,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub requests_forwarded: u64,
    pub requests_failed: u64,
    pub requests_served_locally: u64,
    pub config_reloads: u64,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (config, source, version, loaded_ago) = {
        let loaded = state.config.read().await;
        (
            Arc::clone(&loaded.config),
            loaded.source_name.clone(),
            loaded.version.short(),
            loaded.loaded_at.elapsed().as_secs(),
        )
    };

    let stats = &state.stats;
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        config: ConfigHealth {
            source,
            version,
            loaded_ago_seconds: loaded_ago,
            target: config.backend.target.clone(),
            rules: config.rules.len(),
            static_dir: config.local.static_dir.clone(),
        },
        stats: StatsResponse {
            requests_forwarded: stats.forwarded.load(Ordering::Relaxed),
            requests_failed: stats.failed.load(Ordering::Relaxed),
            requests_served_locally: stats.served_locally.load(Ordering::Relaxed),
            config_reloads: stats.config_reloads.load(Ordering::Relaxed),
        },
    })
}
