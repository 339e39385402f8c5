//! Request dispatch: forward to the backend or handle locally.
//!
//! [`dispatch_handler`] is the Axum fallback that receives every request
//! except the health endpoint, asks the [`filter`](crate::filter) for a
//! route decision on the request path, and hands the request to
//! [`forward`] or [`local`]. Header construction lives in [`headers`].

pub mod forward;
pub mod headers;
pub mod local;

use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::DevgateError;
use crate::filter;
use crate::server::AppState;

const CORRELATION_HEADER: &str = "x-correlation-id";

pub async fn dispatch_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
) -> Response {
    // Clone the Arc<Config> to release the RwLock before any .await
    let config = Arc::clone(&state.config.read().await.config);

    let path = request.uri().path().to_string();
    let Some(rule) = filter::match_rule(&config.rules, &path) else {
        tracing::debug!(method = %request.method(), path = %path, "serving locally");
        state.stats.served_locally.fetch_add(1, Ordering::Relaxed);
        return local::serve_local(&config.local, request).await;
    };

    let correlation_id = request
        .headers()
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from);

    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map_or_else(|| path.clone(), |pq| pq.as_str().to_string());

    tracing::info!(
        correlation_id = %correlation_id,
        method = %parts.method,
        path = %path,
        rule = %rule,
        "forwarding to backend"
    );

    // The body limit layer has already bounded the size.
    let body = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(correlation_id = %correlation_id, error = %e, "failed to read request body");
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    let client_ip = addr.ip().to_string();
    let result = forward::forward(forward::ForwardRequest {
        client: &state.http_client,
        backend: &config.backend,
        method: &parts.method,
        path_and_query: &path_and_query,
        original_headers: &parts.headers,
        body,
        client_ip: &client_ip,
        correlation_id: &correlation_id,
    })
    .await;

    match result {
        Ok(upstream) => {
            state.stats.forwarded.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                correlation_id = %correlation_id,
                status = upstream.status.as_u16(),
                latency_ms = upstream.latency_ms,
                "backend responded"
            );
            relay(upstream, &correlation_id)
        }
        Err(e) => {
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            tracing::error!(
                correlation_id = %correlation_id,
                target = %config.backend.target,
                error = %e,
                "forwarding failed"
            );
            let status = match e {
                DevgateError::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::BAD_GATEWAY,
            };
            (status, [(CORRELATION_HEADER, correlation_id)]).into_response()
        }
    }
}

fn relay(upstream: forward::UpstreamResponse, correlation_id: &str) -> Response {
    let mut resp_headers = upstream.headers;
    headers::strip_response_hop_by_hop(&mut resp_headers);
    resp_headers.remove(CORRELATION_HEADER);

    let mut builder = Response::builder().status(upstream.status);
    for (key, value) in &resp_headers {
        builder = builder.header(key, value);
    }
    builder
        .header(CORRELATION_HEADER, correlation_id)
        .body(axum::body::Body::from(upstream.body))
        .unwrap_or_else(|e| {
            tracing::error!(
                correlation_id = %correlation_id,
                error = %e,
                "failed to build response"
            );
            StatusCode::BAD_GATEWAY.into_response()
        })
}
