use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::catalog::AnimeId;

/// An (identifier, rating) association submitted to the service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RatedPair {
    pub anime_id: AnimeId,
    pub rating: i64,
}

impl RatedPair {
    pub fn new(anime_id: AnimeId, rating: i64) -> Self {
        Self { anime_id, rating }
    }
}

/// Body of `POST /bootstrap_recommend`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BootstrapRequest {
    pub session_key: String,
    pub rated: Vec<RatedPair>,
    pub top_k: u32,
    pub allowed_genres: Option<Vec<String>>,
    pub only_type: Option<String>,
}

/// Body of `POST /recommend`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendRequest {
    pub user_id: Option<u64>,
    pub top_k: u32,
    pub allowed_genres: Option<Vec<String>>,
    pub exclude_anime_ids: Option<Vec<AnimeId>>,
    pub only_type: Option<String>,
    /// Cold-start hints, used by the service when `user_id` is absent
    pub preferred_genres: Option<Vec<String>>,
}

/// Body of `POST /predict`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictRequest {
    pub user_id: u64,
    pub anime_id: AnimeId,
}

/// One ranked item returned by the recommendation service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationItem {
    pub anime_id: AnimeId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub main_genre: Option<String>,
    pub predicted_score_0_1: f64,
}

impl RecommendationItem {
    /// Score as a percentage with one decimal, e.g. `87.5%`
    pub fn score_percent(&self) -> String {
        format!("{:.1}%", self.predicted_score_0_1 * 100.0)
    }

    /// Number of filled stars out of five
    pub fn star_count(&self) -> u8 {
        (self.predicted_score_0_1 * 5.0).round().clamp(0.0, 5.0) as u8
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("Untitled")
    }

    pub fn mal_url(&self) -> String {
        format!("https://myanimelist.net/anime/{}", self.anime_id)
    }
}

/// A response body, decoded as JSON when it parses and kept as text otherwise
#[derive(Debug, Clone, PartialEq)]
pub enum ApiPayload {
    Json(Value),
    Text(String),
}

impl ApiPayload {
    pub fn from_body(body: String) -> Self {
        match serde_json::from_str(&body) {
            Ok(value) => ApiPayload::Json(value),
            Err(_) => ApiPayload::Text(body),
        }
    }

    /// Pretty JSON, or the raw text for non-JSON bodies
    pub fn pretty(&self) -> String {
        match self {
            ApiPayload::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            ApiPayload::Text(text) => text.clone(),
        }
    }
}

/// Message to show for a non-2xx response body.
///
/// A JSON body with a `detail` field yields that detail (strings verbatim,
/// structured details as compact JSON); any other body is shown as-is.
pub fn error_message(body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned());

    let message = match detail {
        Some(Value::String(detail)) => detail,
        Some(detail) => detail.to_string(),
        None => body.to_string(),
    };

    if message.trim().is_empty() {
        "Request failed".to_string()
    } else {
        message
    }
}
