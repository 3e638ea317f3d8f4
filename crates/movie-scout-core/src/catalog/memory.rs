//! In-memory [`CatalogService`] implementation for demos and tests.
//!
//! Uses `Vec`s behind `std::sync::RwLock`. Name lookups are
//! case-insensitive substring matches; pages are fixed-size slices of the
//! catalog in insertion order. Confirming an import appends the chosen
//! external title to the catalog, so later pages and lookups see it.

use std::sync::{PoisonError, RwLock};

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{Candidate, CatalogItem, Category, ExternalTitle, Person};

use super::CatalogService;

/// Default number of items per catalog page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Seed data for an [`InMemoryCatalog`], as read from a JSON fixture.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFixture {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub items: Vec<CatalogItem>,
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Titles available from the external import source.
    #[serde(default)]
    pub external: Vec<ExternalTitle>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// In-memory catalog.
pub struct InMemoryCatalog {
    page_size: usize,
    people: Vec<Person>,
    items: RwLock<Vec<CatalogItem>>,
    categories: Vec<Category>,
    external: Vec<ExternalTitle>,
}

impl InMemoryCatalog {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            people: Vec::new(),
            items: RwLock::new(Vec::new()),
            categories: Vec::new(),
            external: Vec::new(),
        }
    }

    pub fn from_fixture(fixture: CatalogFixture) -> Self {
        Self::new(fixture.page_size)
            .with_people(fixture.people)
            .with_items(fixture.items)
            .with_categories(fixture.categories)
            .with_external_titles(fixture.external)
    }

    pub fn with_people(mut self, people: Vec<Person>) -> Self {
        self.people = people;
        self
    }

    pub fn with_items(self, items: Vec<CatalogItem>) -> Self {
        *self.items.write().unwrap_or_else(PoisonError::into_inner) = items;
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_external_titles(mut self, external: Vec<ExternalTitle>) -> Self {
        self.external = external;
        self
    }

    /// Number of items currently in the catalog.
    pub fn len(&self) -> usize {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn external_matches(&self, query: &str) -> Vec<ExternalTitle> {
        let needle = query.replace('+', " ").to_lowercase();
        self.external
            .iter()
            .filter(|t| t.title.to_lowercase().contains(needle.trim()))
            .cloned()
            .collect()
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

fn matches(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl CatalogService for InMemoryCatalog {
    async fn find_person_by_name(&self, name: &str) -> Result<Vec<Candidate>> {
        if name.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .people
            .iter()
            .filter(|p| matches(&p.name, name.trim()))
            .cloned()
            .map(Candidate::Person)
            .collect())
    }

    async fn find_title_by_name(&self, text: &str) -> Result<Vec<Candidate>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        Ok(items
            .iter()
            .filter(|i| matches(&i.title, text.trim()))
            .cloned()
            .map(Candidate::Title)
            .collect())
    }

    async fn fetch_catalog_page(&self, page: u32) -> Result<Vec<CatalogItem>> {
        if page == 0 {
            bail!("catalog pages are numbered from 1");
        }
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        let start = (page as usize - 1).saturating_mul(self.page_size);
        Ok(items
            .iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect())
    }

    async fn fetch_category_list(&self) -> Result<Vec<Category>> {
        Ok(self.categories.clone())
    }

    async fn fetch_items_by_category(&self, id: i64) -> Result<Vec<CatalogItem>> {
        if !self.categories.iter().any(|c| c.id == id) {
            bail!("unknown category: {}", id);
        }
        let items = self.items.read().unwrap_or_else(PoisonError::into_inner);
        Ok(items
            .iter()
            .filter(|i| i.category_ids.contains(&id))
            .cloned()
            .collect())
    }

    async fn search_external_title(&self, query: &str) -> Result<Vec<ExternalTitle>> {
        Ok(self.external_matches(query))
    }

    async fn confirm_import(&self, query: &str, ordinal: usize) -> Result<bool> {
        let chosen = match self.external_matches(query).into_iter().nth(ordinal) {
            Some(t) => t,
            None => return Ok(false),
        };
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let already_imported = items
            .iter()
            .any(|i| i.title == chosen.title && i.release_date == chosen.release_date);
        if !already_imported {
            let id = items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
            items.push(CatalogItem {
                id,
                title: chosen.title,
                release_date: chosen.release_date,
                overview: chosen.overview,
                category_ids: Vec::new(),
            });
        }
        Ok(true)
    }
}
