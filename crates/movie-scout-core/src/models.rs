//! Catalog data types shared by the state engine and every backend.
//!
//! These mirror what the catalog service hands back: people and titles for
//! typeahead suggestions, catalog items for the scroll feed and category
//! overlay, and external titles offered for import.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A title stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub overview: Option<String>,
    /// Categories this title is filed under.
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

/// A person (cast member) known to the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
}

/// A typeahead suggestion: either a person or a catalog title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Candidate {
    Person(Person),
    Title(CatalogItem),
}

impl Candidate {
    /// Catalog id of the underlying person or title.
    pub fn id(&self) -> i64 {
        match self {
            Candidate::Person(p) => p.id,
            Candidate::Title(t) => t.id,
        }
    }

    /// Human-readable label used in suggestion lists.
    pub fn label(&self) -> &str {
        match self {
            Candidate::Person(p) => &p.name,
            Candidate::Title(t) => &t.title,
        }
    }
}

/// A category (genre) used by the filter overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A title match found in the external import source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalTitle {
    pub title: String,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub overview: Option<String>,
}

/// An external title offered for import, numbered by its position in the
/// search that produced it.
///
/// The ordinal is only meaningful relative to that search: the backend
/// re-runs the same query on confirmation and picks the entry at this
/// position. It is never a catalog id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportCandidate {
    pub ordinal: usize,
    #[serde(flatten)]
    pub title: ExternalTitle,
}

impl ImportCandidate {
    /// Assigns 0-based ordinals in sequence order.
    pub fn number(titles: Vec<ExternalTitle>) -> Vec<ImportCandidate> {
        titles
            .into_iter()
            .enumerate()
            .map(|(ordinal, title)| ImportCandidate { ordinal, title })
            .collect()
    }
}
