// src/proxy.rs
//
// Local dev glue: requests under /api and /upload are forwarded verbatim to
// the configured upstream origin, the way the frontend dev server proxy did.
// Not part of the functional contract.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, HeaderName, Method, Uri, header},
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::state::AppState;

/// Hop-by-hop headers never travel through a proxy. Host and Content-Length
/// are recomputed for the outgoing request.
fn is_skipped_header(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    ) || name == header::HOST
        || name == header::CONTENT_LENGTH
}

pub async fn proxy_handler(
    State(app_state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let target = app_state
        .upstream
        .origin
        .join(path_and_query)
        .map_err(|e| AppError::BadRequest(format!("unroutable path '{}': {}", path_and_query, e)))?;

    tracing::debug!("Proxying {} {} -> {}", method, path_and_query, target);

    let mut outgoing_headers = HeaderMap::new();
    for (name, value) in headers.iter() {
        if !is_skipped_header(name) {
            outgoing_headers.append(name.clone(), value.clone());
        }
    }

    let upstream = app_state
        .http
        .request(method, target.as_str())
        .headers(outgoing_headers)
        .body(body.to_vec())
        .send()
        .await
        .map_err(|e| AppError::UpstreamUnavailable(e.to_string()))?;

    let status = upstream.status();
    let mut response_headers = HeaderMap::new();
    for (name, value) in upstream.headers().iter() {
        if !is_skipped_header(name) {
            response_headers.append(name, value.clone());
        }
    }

    let body = upstream
        .bytes()
        .await
        .map_err(|e| AppError::UpstreamUnavailable(e.to_string()))?;

    Ok((status, response_headers, body).into_response())
}
