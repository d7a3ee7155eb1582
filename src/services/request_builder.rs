//! Turns form input into recommendation service payloads.
//!
//! Free-text list fields are split on commas and newlines, trimmed and
//! deduplicated; an empty result is sent as `null`, never as `[]`. The
//! "None" type choice is likewise sent as `null`.

use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::{AnimeId, BootstrapRequest, PredictRequest, RatedPair, RecommendRequest},
};

/// Type dropdown value meaning "no type constraint"
pub const NO_TYPE_LABEL: &str = "None";

/// Shown when a bootstrap submission has nothing rated
pub const NO_RATINGS_MESSAGE: &str = "Please rate at least 1 anime (0..10).";

pub const DEFAULT_TOP_K: u32 = 10;
pub const DEFAULT_ONLY_TYPE: &str = "TV";
pub const DEFAULT_BOOTSTRAP_GENRES: &str = "Action, Adventure";

fn is_list_separator(c: char) -> bool {
    c == ',' || c == '\n'
}

/// Splits free text into trimmed, non-empty, first-occurrence-unique fragments.
pub fn split_list(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split(is_list_separator)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .filter(|fragment| seen.insert(*fragment))
        .map(str::to_string)
        .collect()
}

/// `split_list`, with an empty result mapped to `None`.
pub fn optional_list(text: &str) -> Option<Vec<String>> {
    let list = split_list(text);
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

/// Parses a list of ids separated by commas or whitespace, skipping anything
/// that is not a non-negative integer.
pub fn parse_id_list(text: &str) -> Vec<AnimeId> {
    let mut seen = HashSet::new();
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter_map(|fragment| fragment.trim().parse::<AnimeId>().ok())
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Maps the type dropdown value to the wire field.
pub fn parse_type_constraint(label: &str) -> Option<String> {
    if label == NO_TYPE_LABEL {
        None
    } else {
        Some(label.to_string())
    }
}

/// Parses `id:rating` tokens separated by commas or newlines.
///
/// Tokens without a colon, or with a side that is not an integer, are
/// skipped. Ratings are kept as written, zero included.
pub fn parse_rated_pairs(text: &str) -> Vec<RatedPair> {
    text.split(is_list_separator)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| {
            let (id, rating) = token.split_once(':')?;
            let anime_id = id.trim().parse::<AnimeId>().ok()?;
            let rating = rating.trim().parse::<i64>().ok()?;
            Some(RatedPair::new(anime_id, rating))
        })
        .collect()
}

/// Optional numeric user id; blank means "no user".
pub fn parse_user_id(text: &str) -> AppResult<Option<u64>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    text.parse::<u64>()
        .map(Some)
        .map_err(|_| AppError::InvalidInput(format!("User ID must be a number, got '{}'", text)))
}

fn require_positive_top_k(top_k: u32) -> AppResult<u32> {
    if top_k == 0 {
        return Err(AppError::InvalidInput(
            "Number of recommendations must be positive".to_string(),
        ));
    }
    Ok(top_k)
}

/// Random `guest-xxxxx` key identifying an anonymous rating session
pub fn generate_session_key() -> String {
    let suffix: String = uuid::Uuid::new_v4().simple().to_string().chars().take(5).collect();
    format!("guest-{}", suffix)
}

/// Options for `POST /bootstrap_recommend`, as typed into the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapForm {
    pub session_key: String,
    pub top_k: u32,
    pub allowed_genres: String,
    pub only_type: String,
}

impl Default for BootstrapForm {
    fn default() -> Self {
        Self {
            session_key: generate_session_key(),
            top_k: DEFAULT_TOP_K,
            allowed_genres: DEFAULT_BOOTSTRAP_GENRES.to_string(),
            only_type: DEFAULT_ONLY_TYPE.to_string(),
        }
    }
}

impl BootstrapForm {
    /// Builds the payload from the pairs with a positive rating; fails
    /// locally when none qualify.
    pub fn build(&self, mut rated: Vec<RatedPair>) -> AppResult<BootstrapRequest> {
        rated.retain(|pair| pair.rating > 0);
        if rated.is_empty() {
            return Err(AppError::InvalidInput(NO_RATINGS_MESSAGE.to_string()));
        }

        Ok(BootstrapRequest {
            session_key: self.session_key.clone(),
            rated,
            top_k: require_positive_top_k(self.top_k)?,
            allowed_genres: optional_list(&self.allowed_genres),
            only_type: parse_type_constraint(&self.only_type),
        })
    }

    /// Builds the payload from hand-typed `id:rating` text.
    pub fn build_from_text(&self, rated_text: &str) -> AppResult<BootstrapRequest> {
        self.build(parse_rated_pairs(rated_text))
    }
}

/// Options for `POST /recommend`, as typed into the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendForm {
    pub user_id: String,
    pub top_k: u32,
    pub allowed_genres: String,
    pub exclude_anime_ids: String,
    pub only_type: String,
    pub preferred_genres: String,
}

impl Default for RecommendForm {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            top_k: DEFAULT_TOP_K,
            allowed_genres: String::new(),
            exclude_anime_ids: String::new(),
            only_type: DEFAULT_ONLY_TYPE.to_string(),
            preferred_genres: String::new(),
        }
    }
}

impl RecommendForm {
    pub fn build(&self) -> AppResult<RecommendRequest> {
        let excluded = parse_id_list(&self.exclude_anime_ids);

        Ok(RecommendRequest {
            user_id: parse_user_id(&self.user_id)?,
            top_k: require_positive_top_k(self.top_k)?,
            allowed_genres: optional_list(&self.allowed_genres),
            exclude_anime_ids: if excluded.is_empty() { None } else { Some(excluded) },
            only_type: parse_type_constraint(&self.only_type),
            preferred_genres: optional_list(&self.preferred_genres),
        })
    }
}

/// Options for `POST /predict`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictForm {
    pub user_id: String,
    pub anime_id: String,
}

impl PredictForm {
    pub fn build(&self) -> AppResult<PredictRequest> {
        let user_id = parse_user_id(&self.user_id)?
            .ok_or_else(|| AppError::InvalidInput("User ID is required".to_string()))?;
        let anime_id = self.anime_id.trim().parse::<AnimeId>().map_err(|_| {
            AppError::InvalidInput(format!("Anime ID must be a number, got '{}'", self.anime_id.trim()))
        })?;

        Ok(PredictRequest { user_id, anime_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bootstrap_form(allowed_genres: &str, only_type: &str) -> BootstrapForm {
        BootstrapForm {
            session_key: "guest-abcde".to_string(),
            top_k: 10,
            allowed_genres: allowed_genres.to_string(),
            only_type: only_type.to_string(),
        }
    }

    #[test]
    fn test_split_list_trims_and_dedupes() {
        assert_eq!(
            split_list(" Action, Comedy\nAction,, \n Drama "),
            vec!["Action", "Comedy", "Drama"]
        );
        assert!(split_list(" , \n ").is_empty());
    }

    #[test]
    fn test_split_list_is_idempotent() {
        for input in ["Action, Adventure", "a,,b\n c , a", "", " x ", "Sci-Fi\nSlice of Life, Sci-Fi"] {
            let once = split_list(input);
            let twice = split_list(&once.join(","));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_optional_list_maps_empty_to_none() {
        assert_eq!(optional_list("  "), None);
        assert_eq!(optional_list("Action"), Some(vec!["Action".to_string()]));
    }

    #[test]
    fn test_parse_id_list_skips_non_numeric() {
        assert_eq!(parse_id_list("11061, 9253\nabc 1535,,11061"), vec![11061, 9253, 1535]);
        assert!(parse_id_list("x, y").is_empty());
    }

    #[test]
    fn test_type_constraint_sentinel() {
        assert_eq!(parse_type_constraint("None"), None);
        assert_eq!(parse_type_constraint("Movie"), Some("Movie".to_string()));
    }

    #[test]
    fn test_parse_rated_pairs_keeps_zero_literal() {
        assert_eq!(
            parse_rated_pairs("1:10, 2:0, x:5, 3:7"),
            vec![RatedPair::new(1, 10), RatedPair::new(2, 0), RatedPair::new(3, 7)]
        );
    }

    #[test]
    fn test_parse_rated_pairs_skips_malformed_tokens() {
        assert_eq!(
            parse_rated_pairs("9253:10\n11061 : 9, 1535, 7:, :4, 8:high"),
            vec![RatedPair::new(9253, 10), RatedPair::new(11061, 9)]
        );
    }

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("").unwrap(), None);
        assert_eq!(parse_user_id(" 12345 ").unwrap(), Some(12345));
        assert!(parse_user_id("abc").is_err());
    }

    #[test]
    fn test_bootstrap_requires_a_rating() {
        let err = bootstrap_form("Action", "TV").build(vec![]).unwrap_err();
        assert_eq!(err.user_message(), NO_RATINGS_MESSAGE);
    }

    #[test]
    fn test_bootstrap_empty_genres_are_null() {
        let request = bootstrap_form("  ,  ", "None")
            .build(vec![RatedPair::new(1, 10)])
            .unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            json!({
                "session_key": "guest-abcde",
                "rated": [{"anime_id": 1, "rating": 10}],
                "top_k": 10,
                "allowed_genres": null,
                "only_type": null
            })
        );
    }

    #[test]
    fn test_bootstrap_from_text() {
        let request = bootstrap_form("Action, Adventure", "TV")
            .build_from_text("9253:10, 11061:9, 1535:8")
            .unwrap();
        assert_eq!(request.rated.len(), 3);
        assert_eq!(
            request.allowed_genres,
            Some(vec!["Action".to_string(), "Adventure".to_string()])
        );
        assert_eq!(request.only_type.as_deref(), Some("TV"));

        assert!(bootstrap_form("", "TV").build_from_text("garbage").is_err());
    }

    #[test]
    fn test_bootstrap_submits_only_positive_ratings() {
        let form = bootstrap_form("", "TV");

        let err = form.build_from_text("2:0").unwrap_err();
        assert_eq!(err.user_message(), NO_RATINGS_MESSAGE);
        assert!(form.build_from_text("4:-1, 5:0").is_err());

        let request = form.build_from_text("1:10, 2:0, 5:-3, 3:7").unwrap();
        assert_eq!(request.rated, vec![RatedPair::new(1, 10), RatedPair::new(3, 7)]);

        let request = form.build_from_text("1:10, 2:0, x:5, 3:7").unwrap();
        assert_eq!(request.rated, vec![RatedPair::new(1, 10), RatedPair::new(3, 7)]);
    }

    #[test]
    fn test_bootstrap_rejects_zero_top_k() {
        let mut form = bootstrap_form("", "TV");
        form.top_k = 0;
        assert!(form.build(vec![RatedPair::new(1, 5)]).is_err());
    }

    #[test]
    fn test_recommend_form_cold_start() {
        let form = RecommendForm {
            user_id: String::new(),
            top_k: 5,
            allowed_genres: "Action, Comedy".to_string(),
            exclude_anime_ids: "11061, 9253".to_string(),
            only_type: "None".to_string(),
            preferred_genres: "Romance\nDrama".to_string(),
        };
        let json = serde_json::to_value(form.build().unwrap()).unwrap();
        assert_eq!(
            json,
            json!({
                "user_id": null,
                "top_k": 5,
                "allowed_genres": ["Action", "Comedy"],
                "exclude_anime_ids": [11061, 9253],
                "only_type": null,
                "preferred_genres": ["Romance", "Drama"]
            })
        );
    }

    #[test]
    fn test_recommend_form_defaults_send_nulls() {
        let form = RecommendForm {
            user_id: "12345".to_string(),
            ..Default::default()
        };
        let request = form.build().unwrap();
        assert_eq!(request.user_id, Some(12345));
        assert_eq!(request.allowed_genres, None);
        assert_eq!(request.exclude_anime_ids, None);
        assert_eq!(request.preferred_genres, None);
        assert_eq!(request.only_type.as_deref(), Some("TV"));
    }

    #[test]
    fn test_predict_form() {
        let form = PredictForm {
            user_id: "12345".to_string(),
            anime_id: "9253".to_string(),
        };
        assert_eq!(
            form.build().unwrap(),
            PredictRequest {
                user_id: 12345,
                anime_id: 9253
            }
        );
        assert!(PredictForm::default().build().is_err());
    }

    #[test]
    fn test_generated_session_key_shape() {
        let key = generate_session_key();
        assert!(key.starts_with("guest-"));
        assert_eq!(key.len(), "guest-".len() + 5);
    }
}
