use std::collections::{BTreeMap, HashSet};

use crate::models::{AnimeId, RatedPair};

pub const MIN_RATING: i64 = 0;
pub const MAX_RATING: i64 = 10;

/// Clamps raw input to the accepted rating range before it reaches the store.
pub fn clamp_rating(value: i64) -> i64 {
    value.clamp(MIN_RATING, MAX_RATING)
}

/// Ratings the user has assigned in this session
///
/// The store keeps whatever it is given; range enforcement happens at the
/// input boundary via `clamp_rating`. A rating of zero counts as unrated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RatingStore {
    ratings: BTreeMap<AnimeId, i64>,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the rating for `anime_id`
    pub fn set_rating(&mut self, anime_id: AnimeId, value: i64) {
        self.ratings.insert(anime_id, value);
    }

    pub fn clear_rating(&mut self, anime_id: AnimeId) {
        self.set_rating(anime_id, 0);
    }

    /// Current rating, 0 when unrated
    pub fn rating(&self, anime_id: AnimeId) -> i64 {
        self.ratings.get(&anime_id).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.ratings.clear();
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Pairs eligible for submission: every stored rating above zero, by id.
    pub fn rated_pairs(&self) -> Vec<RatedPair> {
        self.ratings
            .iter()
            .filter(|(_, rating)| **rating > 0)
            .map(|(id, rating)| RatedPair::new(*id, *rating))
            .collect()
    }

    /// Drops ratings whose id is not in `known`; returns how many were removed.
    pub fn prune_to(&mut self, known: &HashSet<AnimeId>) -> usize {
        let before = self.ratings.len();
        self.ratings.retain(|id, _| known.contains(id));
        before - self.ratings.len()
    }
}
