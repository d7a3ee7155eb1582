use reqwest::{header::CACHE_CONTROL, Client as HttpClient};
use serde::Serialize;
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{error_message, ApiPayload, BootstrapRequest, PredictRequest, RecommendRequest},
};

/// Client side of the recommendation service
///
/// Every call returns the decoded body on success. Non-2xx responses become
/// `AppError::Upstream` carrying the message to display.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationService: Send + Sync {
    /// `GET /health`
    async fn health(&self) -> AppResult<ApiPayload>;

    /// `POST /predict`
    async fn predict(&self, request: &PredictRequest) -> AppResult<ApiPayload>;

    /// `POST /recommend`
    async fn recommend(&self, request: &RecommendRequest) -> AppResult<ApiPayload>;

    /// `POST /bootstrap_recommend`
    async fn bootstrap_recommend(&self, request: &BootstrapRequest) -> AppResult<ApiPayload>;
}

/// HTTP implementation, usually pointed at the `/api/proxy` passthrough
#[derive(Clone)]
pub struct HttpRecommendationClient {
    http_client: HttpClient,
    base_url: String,
}

impl HttpRecommendationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get(&self, path: &str) -> AppResult<ApiPayload> {
        let response = self
            .http_client
            .get(self.url(path))
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        Self::read_payload(path, response).await
    }

    async fn post<B: Serialize + Sync>(&self, path: &str, body: &B) -> AppResult<ApiPayload> {
        let response = self
            .http_client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;

        Self::read_payload(path, response).await
    }

    async fn read_payload(path: &str, response: reqwest::Response) -> AppResult<ApiPayload> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(path = %path, status = status.as_u16(), "Recommendation service returned an error");
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let payload = ApiPayload::from_body(body);
        if matches!(payload, ApiPayload::Text(_)) {
            tracing::warn!(path = %path, "Recommendation service returned a non-JSON body");
        }

        Ok(payload)
    }
}

#[async_trait::async_trait]
impl RecommendationService for HttpRecommendationClient {
    #[instrument(skip(self))]
    async fn health(&self) -> AppResult<ApiPayload> {
        self.get("/health").await
    }

    #[instrument(skip(self))]
    async fn predict(&self, request: &PredictRequest) -> AppResult<ApiPayload> {
        self.post("/predict", request).await
    }

    #[instrument(skip(self, request), fields(user_id = ?request.user_id, top_k = request.top_k))]
    async fn recommend(&self, request: &RecommendRequest) -> AppResult<ApiPayload> {
        self.post("/recommend", request).await
    }

    #[instrument(skip(self, request), fields(session_key = %request.session_key, rated = request.rated.len()))]
    async fn bootstrap_recommend(&self, request: &BootstrapRequest) -> AppResult<ApiPayload> {
        self.post("/bootstrap_recommend", request).await
    }
}
