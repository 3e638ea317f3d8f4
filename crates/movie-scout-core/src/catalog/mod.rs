//! Collaborator abstraction for Movie Scout.
//!
//! The [`CatalogService`] trait defines every backend call the state engine
//! makes, enabling pluggable backends (HTTP, in-memory, test fakes). Two
//! smaller seams cover the rest of the outside world: [`AuthSignal`] is the
//! read-only "logged in" flag and [`Navigator`] is the fire-and-forget
//! detail navigation.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Candidate, CatalogItem, Category, ExternalTitle};

/// Abstract catalog backend.
///
/// All operations are async (via `async-trait`). In-memory implementations
/// return immediately-ready futures. An empty `Vec` is a valid answer and
/// never an error; for [`fetch_catalog_page`](CatalogService::fetch_catalog_page)
/// it means the catalog has no further pages.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`find_person_by_name`](CatalogService::find_person_by_name) | Person typeahead lookup |
/// | [`find_title_by_name`](CatalogService::find_title_by_name) | Title typeahead lookup |
/// | [`fetch_catalog_page`](CatalogService::fetch_catalog_page) | One page of the browse feed |
/// | [`fetch_category_list`](CatalogService::fetch_category_list) | All categories |
/// | [`fetch_items_by_category`](CatalogService::fetch_items_by_category) | Every item in a category |
/// | [`search_external_title`](CatalogService::search_external_title) | Import phase 1 |
/// | [`confirm_import`](CatalogService::confirm_import) | Import phase 2 |
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Find people whose name matches `name`.
    async fn find_person_by_name(&self, name: &str) -> Result<Vec<Candidate>>;

    /// Find catalog titles matching `text`.
    async fn find_title_by_name(&self, text: &str) -> Result<Vec<Candidate>>;

    /// Fetch one page of the catalog. Pages are numbered from 1.
    async fn fetch_catalog_page(&self, page: u32) -> Result<Vec<CatalogItem>>;

    /// Fetch every known category.
    async fn fetch_category_list(&self) -> Result<Vec<Category>>;

    /// Fetch all catalog items filed under category `id`.
    async fn fetch_items_by_category(&self, id: i64) -> Result<Vec<CatalogItem>>;

    /// Search the external source. `query` is already normalized
    /// (see [`normalize_query`](crate::import::normalize_query)).
    async fn search_external_title(&self, query: &str) -> Result<Vec<ExternalTitle>>;

    /// Import the `ordinal`-th match of re-running `query` against the
    /// external source. `Ok(false)` means the backend declined.
    async fn confirm_import(&self, query: &str, ordinal: usize) -> Result<bool>;
}

/// Read-only "is the user logged in" signal.
pub trait AuthSignal: Send + Sync {
    fn is_authenticated(&self) -> bool;
}

/// Fire-and-forget navigation to an item's detail view.
pub trait Navigator: Send + Sync {
    fn navigate_to_detail(&self, item_id: i64);
}

/// Route of the detail view for `item_id`.
pub fn detail_route(item_id: i64) -> String {
    format!("movie/{}", item_id)
}

/// A settable [`AuthSignal`] for hosts that track login state themselves.
#[derive(Debug, Default)]
pub struct SessionFlag {
    logged_in: AtomicBool,
}

impl SessionFlag {
    pub fn new(logged_in: bool) -> Self {
        Self {
            logged_in: AtomicBool::new(logged_in),
        }
    }

    pub fn set(&self, logged_in: bool) {
        self.logged_in.store(logged_in, Ordering::SeqCst);
    }
}

impl AuthSignal for SessionFlag {
    fn is_authenticated(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }
}
