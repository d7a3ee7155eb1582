use axum::{
    body::{Body, Bytes},
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Extension, Json,
};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::{RequestId, REQUEST_ID_HEADER};

use super::AppState;

const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Joins the upstream base and a forwarded sub-path with exactly one slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn upstream_base(state: &AppState) -> AppResult<&str> {
    state
        .inner
        .upstream
        .as_deref()
        .ok_or_else(|| AppError::NotConfigured("API base not set".to_string()))
}

/// Copies the upstream status, content type and body bytes into our response.
async fn relay(upstream: reqwest::Response) -> AppResult<Response> {
    let status = StatusCode::from_u16(upstream.status().as_u16())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| HeaderValue::from_str(v).ok())
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    let body = upstream.bytes().await?;

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Serves the catalog CSV with caching disabled
pub async fn catalog_file(State(state): State<AppState>) -> AppResult<Response> {
    let path = &state.inner.catalog_path;
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!(
                "Catalog not found at {}",
                path.display()
            )));
        }
        Err(e) => return Err(e.into()),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(text))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Forwards `GET /api/proxy/*path` with its query string
pub async fn proxy_get(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(path): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> AppResult<Response> {
    let target = join_url(upstream_base(&state)?, &path);

    tracing::info!(
        request_id = %request_id,
        target = %target,
        params = params.len(),
        "Forwarding GET"
    );

    let upstream = state
        .inner
        .http_client
        .get(&target)
        .query(&params)
        .header(reqwest::header::CACHE_CONTROL, "no-store")
        .header(REQUEST_ID_HEADER, request_id.header_value())
        .send()
        .await?;

    relay(upstream).await
}

/// Forwards `POST /api/proxy/*path` with its body untouched, labelled as JSON
pub async fn proxy_post(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(path): Path<String>,
    body: Bytes,
) -> AppResult<Response> {
    let target = join_url(upstream_base(&state)?, &path);

    tracing::info!(
        request_id = %request_id,
        target = %target,
        bytes = body.len(),
        "Forwarding POST"
    );

    let upstream = state
        .inner
        .http_client
        .post(&target)
        .header(reqwest::header::CONTENT_TYPE, DEFAULT_CONTENT_TYPE)
        .header(REQUEST_ID_HEADER, request_id.header_value())
        .body(body)
        .send()
        .await?;

    relay(upstream).await
}
