use serde_json::{json, Value};

use crate::models::{ApiPayload, RecommendationItem};

const SCORE_FIELD: &str = "predicted_score_0_1";

/// A recommendation response prepared for display
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationResult {
    /// The response with its item list replaced by the sorted one; other
    /// fields are kept for the raw view
    pub response: ApiPayload,
    /// Items that decoded cleanly, highest score first
    pub items: Vec<RecommendationItem>,
}

impl RecommendationResult {
    pub fn pretty(&self) -> String {
        self.response.pretty()
    }
}

fn score_of(item: &Value) -> f64 {
    item.get(SCORE_FIELD)
        .and_then(Value::as_f64)
        .unwrap_or(f64::NEG_INFINITY)
}

/// Stable sort by descending score; items without a score go last.
pub fn sort_by_score(items: &[Value]) -> Vec<Value> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| score_of(b).total_cmp(&score_of(a)));
    sorted
}

/// Extracts and ranks the item list of a service response.
///
/// An object's `items` field is used when it is an array and reset to `[]`
/// otherwise. A bare array is taken as the list itself. Non-object JSON and
/// non-JSON text have no items. The input is left untouched.
pub fn normalize_response(payload: &ApiPayload) -> RecommendationResult {
    let (response, sorted) = match payload {
        ApiPayload::Json(Value::Object(fields)) => {
            let sorted = match fields.get("items") {
                Some(Value::Array(items)) => sort_by_score(items),
                _ => Vec::new(),
            };
            let mut copy = fields.clone();
            copy.insert("items".to_string(), Value::Array(sorted.clone()));
            (ApiPayload::Json(Value::Object(copy)), sorted)
        }
        ApiPayload::Json(Value::Array(items)) => {
            let sorted = sort_by_score(items);
            (ApiPayload::Json(json!({ "items": sorted.clone() })), sorted)
        }
        _ => (payload.clone(), Vec::new()),
    };

    let items: Vec<RecommendationItem> = sorted
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed recommendation item");
                None
            }
        })
        .collect();

    RecommendationResult { response, items }
}
