//! Catalog ingestion
//!
//! Fetches the catalog CSV from a `CatalogSource` and parses it into
//! `CatalogEntry` values. Rows without a numeric `anime_id` or without a name
//! are dropped; a failed fetch is an error, never an empty catalog.

use std::collections::HashSet;

use reqwest::{
    header::{CACHE_CONTROL, PRAGMA},
    Client as HttpClient, StatusCode,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::CatalogEntry,
};

/// Where the raw catalog text comes from
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the full catalog text
    async fn fetch(&self) -> AppResult<String>;

    /// Human-readable location, used in error messages and logs
    fn describe(&self) -> String;
}

/// Catalog served over HTTP, fetched with caching disabled so edits to the
/// file show up on the next load
#[derive(Clone)]
pub struct HttpCatalogSource {
    http_client: HttpClient,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> AppResult<String> {
        let response = self
            .http_client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-cache, no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(|e| {
                AppError::CatalogLoad(format!("Could not fetch catalog from {}: {}", self.url, e))
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::CatalogLoad(format!(
                "Catalog not found at {}",
                self.url
            )));
        }
        if !status.is_success() {
            return Err(AppError::CatalogLoad(format!(
                "Catalog request to {} failed with status {}",
                self.url, status
            )));
        }

        Ok(response.text().await?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// One CSV row before validation; every column is optional at this stage
#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(default)]
    anime_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

impl CatalogRow {
    fn into_entry(self) -> Option<CatalogEntry> {
        let anime_id = self.anime_id?.trim().parse::<u64>().ok()?;

        let name = self.name.unwrap_or_default();
        if name.trim().is_empty() {
            return None;
        }

        Some(CatalogEntry {
            anime_id,
            name,
            genre: self.genre.unwrap_or_default(),
            kind: self.kind.filter(|kind| !kind.trim().is_empty()),
        })
    }
}

/// Parses catalog CSV text (header row first) into entries, in file order.
pub fn parse_catalog(text: &str) -> AppResult<Vec<CatalogEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?;
    if !headers.iter().any(|h| h == "anime_id") {
        tracing::warn!(headers = ?headers, "Catalog has no anime_id column");
    }

    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    let mut dropped = 0usize;

    for result in reader.deserialize::<CatalogRow>() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unreadable catalog row");
                dropped += 1;
                continue;
            }
        };

        match row.into_entry() {
            Some(entry) if seen.insert(entry.anime_id) => entries.push(entry),
            Some(entry) => {
                tracing::warn!(anime_id = entry.anime_id, "Duplicate anime_id in catalog, keeping first");
                dropped += 1;
            }
            None => dropped += 1,
        }
    }

    tracing::info!(entries = entries.len(), dropped, "Catalog parsed");

    Ok(entries)
}

/// Fetches and parses the catalog from `source`.
pub async fn load_catalog(source: &dyn CatalogSource) -> AppResult<Vec<CatalogEntry>> {
    let location = source.describe();
    tracing::info!(source = %location, "Loading catalog");

    let text = source.fetch().await?;

    parse_catalog(&text).map_err(|e| {
        AppError::CatalogLoad(format!("Could not parse catalog from {}: {}", location, e))
    })
}
