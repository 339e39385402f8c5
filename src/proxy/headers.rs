//! Header construction for forwarded requests and relayed responses.
//!
//! [`build_forwarded_headers`] clones the browser's headers (when
//! forwarding is enabled), strips hop-by-hop headers, rewrites `Host`
//! for the backend, adds proxy metadata (`X-Forwarded-*`, `X-Real-IP`,
//! `Via`, `X-Correlation-Id`), and applies the backend's custom header
//! rules. Cookies pass through untouched so OAuth and logout flows keep
//! their session.

use std::sync::LazyLock;

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::config::model::Backend;

static HOP_BY_HOP: LazyLock<Vec<HeaderName>> = LazyLock::new(|| {
    [
        "connection",
        "keep-alive",
        "transfer-encoding",
        "te",
        "trailer",
        "upgrade",
        "proxy-authorization",
        "proxy-authenticate",
    ]
    .iter()
    .filter_map(|name| name.parse::<HeaderName>().ok())
    .collect()
});

/// Strip hop-by-hop headers and `content-length` from a backend response.
///
/// The body has already been collected, so the origin's framing headers
/// no longer apply; Axum sets `content-length` from the actual bytes.
pub fn strip_response_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
    headers.remove(http::header::CONTENT_LENGTH);
}

pub fn build_forwarded_headers(
    original: &HeaderMap,
    client_ip: &str,
    target_url: &url::Url,
    backend: &Backend,
    correlation_id: &str,
) -> HeaderMap {
    let mut headers = if backend.forward_headers {
        original.clone()
    } else {
        HeaderMap::new()
    };

    if backend.strip_hop_by_hop {
        for header_name in HOP_BY_HOP.iter() {
            headers.remove(header_name);
        }
    }

    // The request body is re-sent whole; hyper computes the length.
    headers.remove(http::header::CONTENT_LENGTH);

    if let Some(host) = target_url.host_str() {
        let host_value = target_url
            .port()
            .map_or_else(|| host.to_string(), |port| format!("{host}:{port}"));
        if let Ok(val) = HeaderValue::from_str(&host_value) {
            headers.insert(http::header::HOST, val);
        }
    }

    if backend.proxy_headers {
        let xff = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .map_or_else(
                || client_ip.to_string(),
                |existing| format!("{existing}, {client_ip}"),
            );
        if let Ok(val) = HeaderValue::from_str(&xff) {
            headers.insert("x-forwarded-for", val);
        }

        let real_ip = xff.split(',').next().unwrap_or(client_ip).trim();
        if let Ok(val) = HeaderValue::from_str(real_ip) {
            headers.insert("x-real-ip", val);
        }

        // The browser talked plain HTTP to the dev proxy.
        headers.insert("x-forwarded-proto", HeaderValue::from_static("http"));

        if let Some(original_host) = original.get(http::header::HOST) {
            headers.insert("x-forwarded-host", original_host.clone());
        }

        headers.insert(http::header::VIA, HeaderValue::from_static("1.1 devgate"));

        if let Ok(val) = HeaderValue::from_str(correlation_id) {
            headers.insert("x-correlation-id", val);
        }
    }

    for (key, value) in &backend.headers.add {
        match (key.parse::<HeaderName>(), HeaderValue::from_str(value)) {
            (Ok(name), Ok(val)) => {
                headers.insert(name, val);
            }
            _ => {
                tracing::warn!(header = %key, "invalid header name or value in backend.headers.add, skipping");
            }
        }
    }

    for key in &backend.headers.strip {
        if let Ok(name) = key.parse::<HeaderName>() {
            headers.remove(&name);
        }
    }

    headers
}
