//! Correlation ids shared by the rating client, this server and the
//! recommendation service behind `/api/proxy`.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Id sent by the caller when it is a uuid; a fresh one otherwise
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(RequestId)
            .unwrap_or_else(RequestId::new)
    }

    /// Header form, attached to our response and to forwarded upstream calls
    pub fn header_value(&self) -> HeaderValue {
        // a hyphenated uuid is always a valid header value
        HeaderValue::from_str(&self.0.to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_headers(request.headers());
    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(REQUEST_ID_HEADER, request_id.header_value());
    response
}

/// `TraceLayer` span. Proxied calls also record the forwarded sub-path so
/// upstream failures can be matched to the endpoint that caused them.
pub fn make_span_with_request_id(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(ToString::to_string)
        .unwrap_or_else(|| "unknown".to_string());
    let path = request.uri().path();

    match path.strip_prefix("/api/proxy/") {
        Some(forwarded) => tracing::info_span!(
            "proxy",
            method = %request.method(),
            forwarded = %forwarded,
            request_id = %request_id,
        ),
        None => tracing::info_span!(
            "http_request",
            method = %request.method(),
            path = %path,
            request_id = %request_id,
        ),
    }
}
