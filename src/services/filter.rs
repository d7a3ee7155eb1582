use crate::models::{CatalogEntry, FacetSelection};

/// Search box text plus the two facet dropdowns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub query: String,
    pub category: FacetSelection,
    pub genre: FacetSelection,
}

impl FilterCriteria {
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        self.matches_query(entry) && self.matches_category(entry) && self.matches_genre(entry)
    }

    fn matches_query(&self, entry: &CatalogEntry) -> bool {
        if self.query.is_empty() {
            return true;
        }

        entry
            .name
            .to_lowercase()
            .contains(&self.query.to_lowercase())
            || entry.anime_id.to_string().contains(&self.query)
    }

    fn matches_category(&self, entry: &CatalogEntry) -> bool {
        match &self.category {
            FacetSelection::All => true,
            FacetSelection::Only(label) => entry.category() == label,
        }
    }

    fn matches_genre(&self, entry: &CatalogEntry) -> bool {
        match &self.genre {
            FacetSelection::All => true,
            FacetSelection::Only(tag) => entry.genres().any(|g| g == tag),
        }
    }
}

/// Entries matching `criteria`, in catalog order.
pub fn filter_catalog<'a>(entries: &'a [CatalogEntry], criteria: &FilterCriteria) -> Vec<&'a CatalogEntry> {
    entries.iter().filter(|entry| criteria.matches(entry)).collect()
}
