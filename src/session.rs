//! Browsing and rating state for one client session.
//!
//! Holds the catalog, search and facet choices, the current page, the user's
//! ratings and the last recommendation result. Everything shown on screen is
//! derived from that state on demand, so it cannot go stale.
//!
//! Submissions are tagged with an increasing sequence number; a response is
//! applied only if no newer submission has been issued since.

use std::collections::HashSet;

use crate::{
    error::AppResult,
    models::{AnimeId, ApiPayload, BootstrapRequest, CatalogEntry, FacetSelection, FacetSet, RatedPair},
    services::{
        build_facets, clamp_rating, filter_catalog, load_catalog, normalize_response, page_bounds,
        page_count, page_slice, BootstrapForm, CatalogSource, FilterCriteria, RatingStore,
        RecommendationResult, RecommendationService, PAGE_SIZE,
    },
};

/// A bootstrap request that passed local validation and awaits its response
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub seq: u64,
    pub request: BootstrapRequest,
}

/// What happened to a completed submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Applied,
    /// A newer submission was issued first; the response was dropped
    Stale,
}

#[derive(Debug)]
pub struct RatingSession {
    catalog: Vec<CatalogEntry>,
    catalog_loading: bool,
    criteria: FilterCriteria,
    page: usize,
    ratings: RatingStore,
    pub form: BootstrapForm,
    result: Option<RecommendationResult>,
    error: Option<String>,
    issued_seq: u64,
    in_flight: usize,
}

impl Default for RatingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingSession {
    /// Creates an empty session on page 1 with a fresh guest session key
    pub fn new() -> Self {
        Self {
            catalog: Vec::new(),
            catalog_loading: false,
            criteria: FilterCriteria::default(),
            page: 1,
            ratings: RatingStore::new(),
            form: BootstrapForm::default(),
            result: None,
            error: None,
            issued_seq: 0,
            in_flight: 0,
        }
    }

    // Catalog

    /// Marks a catalog load as started. Callers driving the fetch themselves
    /// pair this with `complete_catalog_load`.
    pub fn begin_catalog_load(&mut self) {
        self.catalog_loading = true;
        self.error = None;
    }

    /// Applies a fetched catalog, replacing any previous one wholesale.
    ///
    /// On failure the catalog is left empty and the message is kept in
    /// `error()`. Ratings for ids missing from a newly loaded catalog are
    /// dropped.
    pub fn complete_catalog_load(&mut self, loaded: AppResult<Vec<CatalogEntry>>) -> AppResult<()> {
        self.catalog_loading = false;
        self.page = 1;

        match loaded {
            Ok(entries) => {
                let known: HashSet<AnimeId> = entries.iter().map(|e| e.anime_id).collect();
                let pruned = self.ratings.prune_to(&known);
                if pruned > 0 {
                    tracing::info!(pruned, "Dropped ratings for entries missing from reloaded catalog");
                }
                self.catalog = entries;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Catalog load failed");
                self.catalog.clear();
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Fetches, parses and applies the catalog from `source` in one step.
    pub async fn load_catalog(&mut self, source: &dyn CatalogSource) -> AppResult<()> {
        self.begin_catalog_load();
        let loaded = load_catalog(source).await;
        self.complete_catalog_load(loaded)
    }

    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    pub fn is_catalog_loading(&self) -> bool {
        self.catalog_loading
    }

    pub fn facets(&self) -> FacetSet {
        build_facets(&self.catalog)
    }

    // Search, filters and paging

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.criteria.query = query.into();
        self.page = 1;
    }

    /// Sets the type dropdown; "All" removes the constraint.
    pub fn set_type_filter(&mut self, label: &str) {
        self.criteria.category = FacetSelection::from_label(label);
        self.page = 1;
    }

    /// Sets the genre dropdown; "All" removes the constraint.
    pub fn set_genre_filter(&mut self, label: &str) {
        self.criteria.genre = FacetSelection::from_label(label);
        self.page = 1;
    }

    pub fn filtered(&self) -> Vec<&CatalogEntry> {
        filter_catalog(&self.catalog, &self.criteria)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        page_count(self.filtered().len(), PAGE_SIZE)
    }

    pub fn page_rows(&self) -> Vec<&CatalogEntry> {
        let filtered = self.filtered();
        page_slice(&filtered, self.page, PAGE_SIZE).to_vec()
    }

    /// First row, last row and total for the current page
    pub fn showing(&self) -> (usize, usize, usize) {
        page_bounds(self.filtered().len(), self.page, PAGE_SIZE)
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.page_count());
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.go_to_page(self.page.saturating_sub(1));
    }

    // Ratings

    pub fn ratings(&self) -> &RatingStore {
        &self.ratings
    }

    pub fn rating(&self, anime_id: AnimeId) -> i64 {
        self.ratings.rating(anime_id)
    }

    /// Stores a rating from the slider or number box, clamped to 0..=10.
    pub fn rate(&mut self, anime_id: AnimeId, value: i64) {
        self.ratings.set_rating(anime_id, clamp_rating(value));
    }

    pub fn clear_rating(&mut self, anime_id: AnimeId) {
        self.ratings.clear_rating(anime_id);
    }

    /// Forgets every rating together with the result they produced.
    pub fn clear_ratings(&mut self) {
        self.ratings.clear();
        self.result = None;
    }

    pub fn rated_pairs(&self) -> Vec<RatedPair> {
        self.ratings.rated_pairs()
    }

    // Submission

    pub fn result(&self) -> Option<&RecommendationResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight > 0
    }

    /// Validates the current ratings and options and issues a new sequence
    /// number. Nothing is issued when validation fails.
    pub fn begin_submit(&mut self) -> AppResult<PendingSubmission> {
        let request = match self.form.build(self.rated_pairs()) {
            Ok(request) => request,
            Err(e) => {
                self.error = Some(e.user_message());
                return Err(e);
            }
        };

        self.issued_seq += 1;
        self.in_flight += 1;
        self.error = None;
        self.result = None;

        tracing::info!(
            seq = self.issued_seq,
            rated = request.rated.len(),
            top_k = request.top_k,
            "Submitting bootstrap recommendation"
        );

        Ok(PendingSubmission {
            seq: self.issued_seq,
            request,
        })
    }

    /// Applies the response to submission `seq` unless a newer one exists.
    pub fn complete_submit(&mut self, seq: u64, outcome: AppResult<ApiPayload>) -> SubmitOutcome {
        self.in_flight = self.in_flight.saturating_sub(1);

        if seq != self.issued_seq {
            tracing::debug!(seq, latest = self.issued_seq, "Discarding stale recommendation response");
            return SubmitOutcome::Stale;
        }

        match outcome {
            Ok(payload) => {
                let result = normalize_response(&payload);
                tracing::info!(seq, items = result.items.len(), "Recommendations received");
                self.error = None;
                self.result = Some(result);
            }
            Err(e) => {
                tracing::warn!(seq, error = %e, "Recommendation request failed");
                self.error = Some(e.user_message());
            }
        }

        SubmitOutcome::Applied
    }

    /// Validates, sends and applies one bootstrap submission.
    pub async fn submit(&mut self, service: &dyn RecommendationService) -> AppResult<SubmitOutcome> {
        let pending = self.begin_submit()?;
        let outcome = service.bootstrap_recommend(&pending.request).await;
        Ok(self.complete_submit(pending.seq, outcome))
    }
}
