//! Handling for requests the filter keeps local.
//!
//! With a static directory configured, files are served from it through
//! `tower-http`'s [`ServeDir`]; anything not found falls back to the
//! index file, served with 200, so client-side routes (`/home`,
//! `/user/42`) load the app. A missing index is still a 404. Without a
//! directory, the request gets a plain 404.

use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::model::LocalConfig;

pub async fn serve_local(local: &LocalConfig, request: Request) -> Response {
    let Some(ref dir) = local.static_dir else {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    };

    let service = ServeDir::new(dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(dir.join(&local.index)));

    match service.oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}
