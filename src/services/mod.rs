pub mod catalog_index;
pub mod catalog_loader;
pub mod filter;
pub mod pager;
pub mod ratings;
pub mod recommender;
pub mod request_builder;
pub mod response;

pub use catalog_index::build_facets;
pub use catalog_loader::{load_catalog, parse_catalog, CatalogSource, HttpCatalogSource};
pub use filter::{filter_catalog, FilterCriteria};
pub use pager::{page_bounds, page_count, page_slice, PAGE_SIZE};
pub use ratings::{clamp_rating, RatingStore};
pub use recommender::{HttpRecommendationClient, RecommendationService};
pub use request_builder::{
    optional_list, parse_id_list, parse_rated_pairs, parse_type_constraint, split_list,
    BootstrapForm, PredictForm, RecommendForm, NO_RATINGS_MESSAGE,
};
pub use response::{normalize_response, RecommendationResult};

#[cfg(test)]
pub use catalog_loader::MockCatalogSource;
#[cfg(test)]
pub use recommender::MockRecommendationService;
