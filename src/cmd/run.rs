//! `devgate run`: start the proxy server.
//!
//! Loads the config file (explicit, auto-detected, or none at all),
//! applies command-line overrides, starts the Axum server with graceful
//! shutdown, and, when a file is in use, polls it for changes.

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cli::{RunArgs, HEALTH_PATH};
use crate::config::model::Config;
use crate::config::sources;
use crate::config::{ConfigSource, Overrides};
use crate::error::DevgateError;
use crate::logging;
use crate::server::{self, AppState, LoadedConfig};

pub async fn execute(args: RunArgs) -> Result<(), DevgateError> {
    logging::init(&args.log_level, logging::resolve_format(args.pretty, args.json));

    let overrides = args.overrides();
    let source = resolve_file_source(&args).await?;
    let loaded = initial_config(source.as_deref(), &overrides).await?;

    let target = loaded.config.backend.target.clone();
    let rule_count = loaded.config.rules.len();
    let static_dir = loaded.config.local.static_dir.clone();
    if let Some(ref dir) = static_dir {
        if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
            tracing::warn!(static_dir = %dir.display(), "static directory does not exist yet");
        }
    }

    let state = Arc::new(AppState::new(loaded));

    // Shutdown signal: sending on shutdown_tx stops the refresh loop
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let refresh_handle = source.map(|source| {
        let refresh_state = Arc::clone(&state);
        let overrides = overrides.clone();
        let poll_interval = args.poll_interval.max(1);
        tokio::spawn(async move {
            config_refresh_loop(refresh_state, source, overrides, poll_interval, shutdown_rx)
                .await;
        })
    });

    let router = server::build_router(state, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        target = %target,
        rules = rule_count,
        static_dir = ?static_dir,
        health = HEALTH_PATH,
        "devgate started"
    );

    let graceful_shutdown = async move {
        server::shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    };

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(graceful_shutdown)
    .await?;

    if let Some(handle) = refresh_handle {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "config refresh task failed");
        }
    }

    tracing::info!("devgate stopped");
    Ok(())
}

/// Explicit `--config` wins; otherwise probe the working directory. No
/// file is fine: defaults plus flags describe the common setup.
async fn resolve_file_source(
    args: &RunArgs,
) -> Result<Option<Box<dyn ConfigSource>>, DevgateError> {
    if let Some(ref path) = args.config {
        return sources::create_file_source(path).map(Some);
    }

    let cwd = std::env::current_dir()?;
    match sources::detect_config_file(&cwd).await {
        Some(path) => {
            tracing::info!(path = %path.display(), "auto-detected config file");
            sources::create_file_source(&path).map(Some)
        }
        None => {
            tracing::info!("no config file, using built-in rules");
            Ok(None)
        }
    }
}

pub async fn initial_config(
    source: Option<&dyn ConfigSource>,
    overrides: &Overrides,
) -> Result<LoadedConfig, DevgateError> {
    let Some(source) = source else {
        let mut config = Config::default();
        overrides.apply_and_validate(&mut config)?;
        return Ok(LoadedConfig::builtin(config));
    };

    let (mut config, version) = source.load().await?;
    overrides.apply_and_validate(&mut config)?;
    Ok(LoadedConfig {
        config: Arc::new(config),
        version,
        source_name: source.describe(),
        loaded_at: Instant::now(),
    })
}

/// Re-read the config when its content hash changes. A broken edit is
/// logged and the running config stays in place.
pub async fn reload_if_changed(
    state: &AppState,
    source: &dyn ConfigSource,
    overrides: &Overrides,
) {
    let current_version = state.config.read().await.version.clone();

    match source.has_changed(&current_version).await {
        Ok(true) => {
            tracing::info!(source = %source.describe(), "config change detected, reloading");
            let reloaded = match source.load().await {
                Ok((mut config, version)) => overrides
                    .apply_and_validate(&mut config)
                    .map(|()| (config, version)),
                Err(e) => Err(e),
            };
            match reloaded {
                Ok((config, version)) => {
                    let rule_count = config.rules.len();
                    let mut loaded = state.config.write().await;
                    loaded.config = Arc::new(config);
                    loaded.version = version;
                    loaded.loaded_at = Instant::now();
                    drop(loaded);
                    state.stats.config_reloads.fetch_add(1, Ordering::Relaxed);
                    tracing::info!(rules = rule_count, "config reloaded");
                }
                Err(e) => {
                    tracing::error!(error = %e, "config reload failed, keeping current config");
                }
            }
        }
        Ok(false) => {}
        Err(e) => {
            tracing::warn!(error = %e, "config change check failed");
        }
    }
}

async fn config_refresh_loop(
    state: Arc<AppState>,
    source: Box<dyn ConfigSource>,
    overrides: Overrides,
    interval_secs: u64,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await; // Skip first immediate tick

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = shutdown.changed() => {
                tracing::debug!("config refresh loop shutting down");
                return;
            }
        }

        reload_if_changed(&state, source.as_ref(), &overrides).await;
    }
}

#[cfg(all(test, feature = "yaml"))]
mod tests {
    use super::*;
    use crate::config::ConfigVersion;

    #[tokio::test]
    async fn no_file_uses_defaults_and_overrides() {
        let overrides = Overrides {
            target: Some("http://localhost:9000/".into()),
            ..Overrides::default()
        };
        let loaded = initial_config(None, &overrides).await.unwrap();
        assert_eq!(loaded.version, ConfigVersion::Builtin);
        assert_eq!(loaded.config.backend.target, "http://localhost:9000/");
        assert_eq!(loaded.config.rules.len(), 4);
    }

    #[tokio::test]
    async fn reload_swaps_config_and_keeps_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devgate.yaml");
        std::fs::write(&path, r#"{"rules": [{"kind": "exact", "pattern": "logout"}]}"#).unwrap();

        let source = sources::create_file_source(&path).unwrap();
        let overrides = Overrides {
            timeout: Some(1234),
            ..Overrides::default()
        };
        let state = AppState::new(initial_config(Some(source.as_ref()), &overrides).await.unwrap());
        assert_eq!(state.config.read().await.config.rules.len(), 1);

        std::fs::write(
            &path,
            r#"{"rules": [{"kind": "exact", "pattern": "logout"}, {"kind": "prefix", "pattern": "api/"}]}"#,
        )
        .unwrap();
        reload_if_changed(&state, source.as_ref(), &overrides).await;

        let loaded = state.config.read().await;
        assert_eq!(loaded.config.rules.len(), 2);
        assert_eq!(loaded.config.backend.timeout, 1234);
        assert_eq!(state.stats.config_reloads.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn broken_edit_keeps_running_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devgate.yaml");
        std::fs::write(&path, "{}").unwrap();

        let source = sources::create_file_source(&path).unwrap();
        let overrides = Overrides::default();
        let state = AppState::new(initial_config(Some(source.as_ref()), &overrides).await.unwrap());

        std::fs::write(&path, r#"{"rules": "#).unwrap();
        reload_if_changed(&state, source.as_ref(), &overrides).await;

        assert_eq!(state.config.read().await.config.rules.len(), 4);
        assert_eq!(state.stats.config_reloads.load(Ordering::Relaxed), 0);
    }

    /// Source whose content never changes and that cannot be re-read.
    struct Fixed(Config);

    #[async_trait::async_trait]
    impl ConfigSource for Fixed {
        fn describe(&self) -> String {
            "fixed".into()
        }

        async fn load(&self) -> Result<(Config, ConfigVersion), DevgateError> {
            Ok((self.0.clone(), ConfigVersion::Hash("f".repeat(64))))
        }

        async fn has_changed(&self, _: &ConfigVersion) -> Result<bool, DevgateError> {
            Err(DevgateError::UnsupportedFormat("fixed".into()))
        }
    }

    #[tokio::test]
    async fn any_source_can_back_the_server() {
        let source: Box<dyn ConfigSource> = Box::new(Fixed(Config::default()));
        let overrides = Overrides::default();
        let loaded = initial_config(Some(source.as_ref()), &overrides).await.unwrap();
        assert_eq!(loaded.source_name, "fixed");
        assert_eq!(loaded.version.short(), "ffffffff");

        let state = AppState::new(loaded);
        reload_if_changed(&state, source.as_ref(), &overrides).await;
        assert_eq!(state.stats.config_reloads.load(Ordering::Relaxed), 0);
    }
}
