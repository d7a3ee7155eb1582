use serde::{Deserialize, Serialize};

/// Identifier of a catalog entry (the `anime_id` column)
pub type AnimeId = u64;

/// Category label used for entries without a `type`
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One row of the anime catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub anime_id: AnimeId,
    pub name: String,
    /// Raw comma-separated genre tags, as found in the file
    pub genre: String,
    /// The `type` column (TV, Movie, OVA, ...)
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl CatalogEntry {
    pub fn new(anime_id: AnimeId, name: impl Into<String>, genre: impl Into<String>, kind: Option<&str>) -> Self {
        Self {
            anime_id,
            name: name.into(),
            genre: genre.into(),
            kind: kind.map(str::to_string),
        }
    }

    /// Genre tags, trimmed, with empty fragments removed
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        split_genres(&self.genre)
    }

    /// Category label, falling back to "Unknown"
    pub fn category(&self) -> &str {
        self.kind.as_deref().unwrap_or(UNKNOWN_LABEL)
    }

    /// First genre tag, falling back to "Unknown"
    pub fn main_genre(&self) -> &str {
        self.genres().next().unwrap_or(UNKNOWN_LABEL)
    }
}

/// Splits a raw genre field into its tags.
pub fn split_genres(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|tag| !tag.is_empty())
}

/// Distinct facet values present in a catalog, each sorted ascending
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct FacetSet {
    pub types: Vec<String>,
    pub genres: Vec<String>,
}

/// A dropdown choice over one facet
///
/// The UI offers the literal "All" in every facet dropdown; it is turned into
/// `FacetSelection::All` here and nowhere else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FacetSelection {
    #[default]
    All,
    Only(String),
}

impl FacetSelection {
    pub const ALL_LABEL: &'static str = "All";

    pub fn from_label(label: &str) -> Self {
        if label == Self::ALL_LABEL {
            FacetSelection::All
        } else {
            FacetSelection::Only(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FacetSelection::All => Self::ALL_LABEL,
            FacetSelection::Only(value) => value,
        }
    }
}
