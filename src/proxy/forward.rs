//! Forwarding of a single request to the backend origin.
//!
//! The target URI is the backend origin with the request's path and
//! query appended, so `/graphql?query=…` against `http://localhost:8081/`
//! becomes `http://localhost:8081/graphql?query=…`. Redirects are
//! returned to the browser as-is, which OAuth flows depend on.

use std::time::{Duration, Instant};

use axum::http::{HeaderMap, Method};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::StatusCode;

use crate::config::model::Backend;
use crate::error::DevgateError;
use crate::server::HttpClient;

use super::headers::build_forwarded_headers;

#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub latency_ms: u64,
}

pub struct ForwardRequest<'a> {
    pub client: &'a HttpClient,
    pub backend: &'a Backend,
    pub method: &'a Method,
    pub path_and_query: &'a str,
    pub original_headers: &'a HeaderMap,
    pub body: Bytes,
    pub client_ip: &'a str,
    pub correlation_id: &'a str,
}

/// Join the backend origin and a request path, keeping the origin's own
/// path prefix (`http://host/api/` + `/graphql` = `http://host/api/graphql`).
pub fn target_uri(target: &str, path_and_query: &str) -> Result<url::Url, DevgateError> {
    let path_and_query = if path_and_query.starts_with('/') {
        path_and_query.to_string()
    } else {
        format!("/{path_and_query}")
    };
    let joined = format!("{}{}", target.trim_end_matches('/'), path_and_query);
    url::Url::parse(&joined).map_err(|e| DevgateError::UriParse {
        source: Box::new(e),
    })
}

#[allow(clippy::cast_possible_truncation)]
pub async fn forward(req: ForwardRequest<'_>) -> Result<UpstreamResponse, DevgateError> {
    let url = target_uri(&req.backend.target, req.path_and_query)?;
    let headers = build_forwarded_headers(
        req.original_headers,
        req.client_ip,
        &url,
        req.backend,
        req.correlation_id,
    );

    let mut builder = hyper::Request::builder()
        .method(req.method.clone())
        .uri(url.as_str());
    for (key, value) in &headers {
        builder = builder.header(key, value);
    }
    let request = builder
        .body(Full::new(req.body))
        .map_err(|e| DevgateError::HttpRequest {
            source: Box::new(e),
        })?;

    let timeout_ms = req.backend.timeout;
    let start = Instant::now();

    // One deadline for the headers and the whole body.
    let exchange = async {
        let response = req
            .client
            .request(request)
            .await
            .map_err(|e| DevgateError::HttpRequest {
                source: Box::new(e),
            })?;
        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| DevgateError::HttpRequest {
                source: Box::new(e),
            })?
            .to_bytes();
        Ok::<_, DevgateError>((parts.status, parts.headers, body))
    };

    let (status, headers, body) = tokio::time::timeout(Duration::from_millis(timeout_ms), exchange)
        .await
        .map_err(|_| DevgateError::UpstreamTimeout { timeout_ms })??;

    Ok(UpstreamResponse {
        status,
        headers,
        body,
        latency_ms: start.elapsed().as_millis() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_origin_and_path() {
        let url = target_uri("http://localhost:8081/", "/graphql").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8081/graphql");
    }

    #[test]
    fn keeps_query_string() {
        let url = target_uri("http://localhost:8081/", "/oauth/google/callback?code=x&state=y").unwrap();
        assert_eq!(url.path(), "/oauth/google/callback");
        assert_eq!(url.query(), Some("code=x&state=y"));
    }

    #[test]
    fn keeps_origin_path_prefix() {
        let url = target_uri("http://backend/api", "/logout").unwrap();
        assert_eq!(url.as_str(), "http://backend/api/logout");
    }

    #[test]
    fn adds_missing_leading_slash() {
        let url = target_uri("http://localhost:8081", "graphiql").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8081/graphiql");
    }

    #[test]
    fn invalid_origin_is_an_error() {
        assert!(matches!(
            target_uri("not a url", "/graphql"),
            Err(DevgateError::UriParse { .. })
        ));
    }
}
