//! Request forwarding: strip the API prefix, relay everything else verbatim.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use crate::app_state::AppState;

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Maps an incoming path onto the backend, or `None` when it lies outside
/// the prefix. The prefix only matches whole segments.
pub(crate) fn rewrite_path(path: &str, prefix: &str) -> Option<String> {
    if prefix.is_empty() {
        return Some(path.to_string());
    }
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some("/".to_string())
    } else if rest.starts_with('/') {
        Some(rest.to_string())
    } else {
        None
    }
}

/// Copies end-to-end headers. `Host` and `Content-Length` are dropped as
/// well; the outgoing client recomputes both.
pub(crate) fn forwardable_headers(headers: &HeaderMap) -> HeaderMap {
    let mut forwarded = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if HOP_BY_HOP.contains(&name.as_str())
            || name == header::HOST
            || name == header::CONTENT_LENGTH
        {
            continue;
        }
        forwarded.append(name.clone(), value.clone());
    }
    forwarded
}

pub(crate) async fn forward(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, (StatusCode, String)> {
    let Some(path) = rewrite_path(uri.path(), &state.strip_prefix) else {
        return Err((
            StatusCode::NOT_FOUND,
            format!("{} is not proxied", uri.path()),
        ));
    };

    let mut target = format!("{}{}", state.backend_url, path);
    if let Some(query) = uri.query() {
        target.push('?');
        target.push_str(query);
    }
    info!(%method, from = %uri.path(), to = %target, size_bytes = body.len(), "forwarding request");

    let upstream = state
        .http
        .request(method, &target)
        .headers(forwardable_headers(&headers))
        .body(body)
        .send()
        .await
        .map_err(|err| {
            warn!(%target, error = %err, "backend unreachable");
            (StatusCode::BAD_GATEWAY, format!("backend unreachable: {err}"))
        })?;

    let status = upstream.status();
    let response_headers = forwardable_headers(upstream.headers());
    let payload = upstream.bytes().await.map_err(|err| {
        warn!(%target, error = %err, "backend response was cut short");
        (StatusCode::BAD_GATEWAY, format!("backend response failed: {err}"))
    })?;
    info!(%status, size_bytes = payload.len(), "relaying backend response");

    Ok((status, response_headers, payload).into_response())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
