//! Shared state and the Axum router.
//!
//! [`AppState`] carries the active config behind an `RwLock` so reloads
//! can swap it, the pooled backend client, and request counters. The
//! router answers the health endpoint itself and sends everything else
//! through [`proxy::dispatch_handler`].

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::routing::get;
use axum::Router;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::cli::HEALTH_PATH;
use crate::config::model::Config;
use crate::config::ConfigVersion;
use crate::health::health_handler;
use crate::proxy;

#[derive(Debug)]
pub struct LoadedConfig {
    /// Handlers clone the `Arc` and drop the lock before awaiting.
    pub config: Arc<Config>,
    pub version: ConfigVersion,
    /// File path, or `builtin`.
    pub source_name: String,
    pub loaded_at: Instant,
}

impl LoadedConfig {
    /// A config that did not come from a file.
    #[must_use]
    pub fn builtin(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            version: ConfigVersion::Builtin,
            source_name: "builtin".into(),
            loaded_at: Instant::now(),
        }
    }
}

/// Counters reported by the health endpoint.
#[derive(Debug, Default)]
pub struct Stats {
    /// Requests a rule matched and the backend answered.
    pub forwarded: AtomicU64,
    /// Requests a rule matched but forwarding failed (502/504).
    pub failed: AtomicU64,
    pub served_locally: AtomicU64,
    pub config_reloads: AtomicU64,
}

pub type HttpsConnector =
    hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>;
pub type HttpClient = Client<HttpsConnector, http_body_util::Full<bytes::Bytes>>;

pub struct AppState {
    pub config: RwLock<LoadedConfig>,
    pub http_client: HttpClient,
    pub start_time: Instant,
    pub stats: Stats,
}

impl AppState {
    #[must_use]
    pub fn new(loaded: LoadedConfig) -> Self {
        Self {
            config: RwLock::new(loaded),
            http_client: build_http_client(),
            start_time: Instant::now(),
            stats: Stats::default(),
        }
    }
}

#[must_use]
pub fn build_http_client() -> HttpClient {
    // With more than one rustls crypto provider compiled in, rustls cannot
    // pick one on its own; install `ring` explicitly. Fails harmlessly when
    // a provider is already installed.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let https = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_or_http()
        .enable_http1()
        .build();
    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(30))
        .build(https)
}

pub fn build_router(state: Arc<AppState>, max_body: usize) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health_handler))
        .fallback(proxy::dispatch_handler)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body)),
        )
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C"),
        () = terminate => tracing::info!("received SIGTERM"),
    }
}
