//! `devgate health`: check the health of a running instance.
//!
//! Sends a `GET /_devgate/health` request to the given URL and displays
//! the response as formatted text or raw JSON.

use http_body_util::BodyExt;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::cli::{HealthArgs, HEALTH_PATH};
use crate::error::DevgateError;
use crate::health::HealthResponse;

pub async fn execute(args: HealthArgs) -> Result<(), DevgateError> {
    let url = format!("{}{HEALTH_PATH}", args.url.trim_end_matches('/'));
    let uri: hyper::Uri = url
        .parse()
        .map_err(|e: hyper::http::uri::InvalidUri| DevgateError::UriParse {
            source: Box::new(e),
        })?;

    let connector = hyper_util::client::legacy::connect::HttpConnector::new();
    let client = Client::builder(TokioExecutor::new()).build(connector);

    let req = hyper::Request::builder()
        .uri(uri)
        .body(http_body_util::Full::new(bytes::Bytes::new()))
        .map_err(|e| DevgateError::HttpRequest {
            source: Box::new(e),
        })?;

    let response = tokio::time::timeout(std::time::Duration::from_secs(10), client.request(req))
        .await
        .map_err(|_| DevgateError::HttpRequest {
            source: "health check timed out after 10s".into(),
        })?
        .map_err(|e| DevgateError::HttpRequest {
            source: Box::new(e),
        })?;

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .map_err(|e| DevgateError::HttpRequest {
            source: Box::new(e),
        })?
        .to_bytes();

    if !status.is_success() {
        return Err(DevgateError::HealthCheckFailed(status));
    }

    let body_str = String::from_utf8_lossy(&body);
    if args.json {
        println!("{body_str}");
        return Ok(());
    }

    match serde_json::from_str::<HealthResponse>(&body_str) {
        Ok(health) => {
            println!("\u{2713} devgate is healthy ({})", args.url);
            println!("  uptime:         {}", format_uptime(health.uptime_seconds));
            println!(
                "  config:         {} {} (loaded {}s ago)",
                health.config.source, health.config.version, health.config.loaded_ago_seconds
            );
            println!(
                "  backend:        {} ({} rules)",
                health.config.target, health.config.rules
            );
            println!(
                "  static dir:     {}",
                health
                    .config
                    .static_dir
                    .as_ref()
                    .map_or_else(|| "none".to_string(), |d| d.display().to_string())
            );
            println!(
                "  requests:       {} forwarded, {} failed, {} local",
                health.stats.requests_forwarded,
                health.stats.requests_failed,
                health.stats.requests_served_locally
            );
        }
        Err(e) => {
            eprintln!("Failed to parse health response: {e}");
            println!("{body_str}");
        }
    }

    Ok(())
}

fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}
