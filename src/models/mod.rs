pub mod catalog;
pub mod recommendation;

pub use catalog::{split_genres, AnimeId, CatalogEntry, FacetSelection, FacetSet, UNKNOWN_LABEL};
pub use recommendation::{
    error_message, ApiPayload, BootstrapRequest, PredictRequest, RatedPair, RecommendRequest,
    RecommendationItem,
};
