//! Category filter overlay.
//!
//! Selecting a category replaces the overlay's list with every catalog item
//! in that category. The overlay is independent of the scroll feed and does
//! no pagination. Overlapping selections are not ordered: whichever fetch
//! finishes last owns the list.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::CatalogService;
use crate::models::{CatalogItem, Category};

/// Point-in-time view of the overlay for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverlaySnapshot {
    pub menu_open: bool,
    pub loading: bool,
    pub categories: Vec<Category>,
    pub items: Vec<CatalogItem>,
}

#[derive(Debug, Default)]
struct OverlayState {
    menu_open: bool,
    loading: bool,
    categories: Vec<Category>,
    items: Vec<CatalogItem>,
}

pub struct CategoryOverlay {
    catalog: Arc<dyn CatalogService>,
    state: Mutex<OverlayState>,
}

impl CategoryOverlay {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog,
            state: Mutex::new(OverlayState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, OverlayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Loads the category menu. On failure the previous menu stays.
    pub async fn load_categories(&self) -> Result<()> {
        match self.catalog.fetch_category_list().await {
            Ok(categories) => {
                debug!(count = categories.len(), "categories loaded");
                self.state().categories = categories;
                Ok(())
            }
            Err(e) => {
                warn!("category list fetch failed: {:#}", e);
                Err(e)
            }
        }
    }

    /// Flips the menu, unless results are showing: then the menu is forced
    /// closed and the results are cleared. Returns the new visibility.
    pub fn toggle(&self) -> bool {
        let mut state = self.state();
        if state.items.is_empty() {
            state.menu_open = !state.menu_open;
        } else {
            state.menu_open = false;
            state.items.clear();
        }
        state.menu_open
    }

    /// Closes the menu, clears the current results and replaces them with
    /// the items of category `id` once they arrive (even if none).
    ///
    /// On failure `loading` is cleared and the list stays empty.
    pub async fn select_category(&self, id: i64) -> Result<()> {
        {
            let mut state = self.state();
            state.menu_open = false;
            state.loading = true;
            state.items.clear();
        }

        let response = self.catalog.fetch_items_by_category(id).await;

        let mut state = self.state();
        state.loading = false;
        match response {
            Ok(items) => {
                debug!(category = id, count = items.len(), "category items loaded");
                state.items = items;
                Ok(())
            }
            Err(e) => {
                warn!(category = id, "category items fetch failed: {:#}", e);
                Err(e)
            }
        }
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        let state = self.state();
        OverlaySnapshot {
            menu_open: state.menu_open,
            loading: state.loading,
            categories: state.categories.clone(),
            items: state.items.clone(),
        }
    }
}
