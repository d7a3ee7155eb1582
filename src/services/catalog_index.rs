use std::collections::BTreeSet;

use crate::models::{CatalogEntry, FacetSet};

/// Collects the distinct type labels and genre tags of a catalog.
///
/// Entries without a type contribute "Unknown". Both lists come back sorted
/// and duplicate-free.
pub fn build_facets(entries: &[CatalogEntry]) -> FacetSet {
    let types: BTreeSet<&str> = entries.iter().map(CatalogEntry::category).collect();
    let genres: BTreeSet<&str> = entries.iter().flat_map(CatalogEntry::genres).collect();

    FacetSet {
        types: types.into_iter().map(str::to_string).collect(),
        genres: genres.into_iter().map(str::to_string).collect(),
    }
}
