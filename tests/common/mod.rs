#![allow(dead_code)]

use axum::{
    body::Body,
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn catalog_path() -> String {
    concat!(env!("CARGO_MANIFEST_DIR"), "/public/anime.csv").to_string()
}

async fn echo_query(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({
        "params": params,
        "request_id": headers.get("x-request-id").and_then(|v| v.to_str().ok()),
    }))
}

async fn untyped() -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .body(Body::from(r#"{"untyped":true}"#))
        .unwrap()
}

async fn recommend(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "received": body,
        "content_type": headers.get("content-type").and_then(|v| v.to_str().ok()),
        "items": [
            {"anime_id": 1535, "name": "Death Note", "main_genre": "Mystery", "predicted_score_0_1": 0.61},
            {"anime_id": 5114, "name": "Fullmetal Alchemist: Brotherhood", "main_genre": "Action", "predicted_score_0_1": 0.93}
        ]
    }))
}

async fn bootstrap(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let rated = body["rated"].as_array().cloned().unwrap_or_default();
    if rated.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "rated must not be empty"})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "session_key": body["session_key"],
            "rated": body["rated"],
            "allowed_genres": body["allowed_genres"],
            "items": [
                {"anime_id": 11061, "predicted_score_0_1": 0.42},
                {"anime_id": 9253, "name": "Steins;Gate", "predicted_score_0_1": 0.88},
                {"anime_id": 820, "predicted_score_0_1": 0.42}
            ]
        })),
    )
}

async fn latin1() -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "text/plain; charset=iso-8859-1")
        .body(Body::from(LATIN1_CAFE.to_vec()))
        .unwrap()
}

/// `café` encoded as ISO-8859-1
pub const LATIN1_CAFE: &[u8] = &[99, 97, 102, 233];

async fn echo_bytes(body: axum::body::Bytes) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "application/octet-stream")
        .body(Body::from(body))
        .unwrap()
}

async fn crash() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

async fn garbled() -> (StatusCode, &'static str) {
    (StatusCode::OK, "<html>maintenance</html>")
}

/// Stand-in for the recommendation service
pub fn fake_recommender() -> Router {
    Router::new()
        .route("/health", get(|| async { Json(json!({"status": "ok", "model": "stub"})) }))
        .route("/echo", get(echo_query))
        .route("/untyped", get(untyped))
        .route("/predict", post(|Json(body): Json<Value>| async move {
            Json(json!({"user_id": body["user_id"], "anime_id": body["anime_id"], "predicted_rating": 8.4}))
        }))
        .route("/recommend", post(recommend))
        .route("/bootstrap_recommend", post(bootstrap))
        .route("/crash", get(crash))
        .route("/garbled", get(garbled))
        .route("/latin1", get(latin1))
        .route("/echo_bytes", post(echo_bytes))
}
