use std::path::PathBuf;
use std::sync::Arc;

use reqwest::Client as HttpClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<AppStateInner>,
}

/// Read-only settings and the outbound client
pub struct AppStateInner {
    pub http_client: HttpClient,
    /// Base address requests under `/api/proxy` are forwarded to
    pub upstream: Option<String>,
    /// Catalog CSV served at `/anime.csv`
    pub catalog_path: PathBuf,
}

impl AppState {
    pub fn new(upstream: Option<String>, catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                http_client: HttpClient::new(),
                upstream,
                catalog_path: catalog_path.into(),
            }),
        }
    }
}
