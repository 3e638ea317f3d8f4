//! Scroll-driven, page-by-page catalog feed.
//!
//! The feed owns an append-only list of [`CatalogItem`]s, a page cursor that
//! starts at 1, a sticky `exhausted` flag and a `fetch_in_flight` guard.
//! [`ScrollFeed::request_next_page`] is safe to call as often as the scroll
//! observer likes: while a fetch is outstanding, or once an empty page has
//! been seen, it returns [`PageOutcome::Skipped`] without touching the
//! backend.
//!
//! Network errors clear the guard but leave `exhausted` alone, so the next
//! scroll trigger retries the same page.
//!
//! Reinitialization clears everything and bumps an epoch counter. A page
//! that was in flight across a reinitialization is discarded on arrival.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::CatalogService;
use crate::models::CatalogItem;

/// Geometry reported by the scroll observer, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollPosition {
    /// Distance the page is scrolled from its top.
    pub scroll_offset: f64,
    pub viewport_height: f64,
    /// Distance from the page top to the top of the rendered list.
    pub list_offset: f64,
    /// Rendered height of the list.
    pub list_height: f64,
}

impl ScrollPosition {
    /// True once the viewport's bottom edge reaches the list's bottom edge.
    pub fn reached_bottom(&self) -> bool {
        self.scroll_offset + self.viewport_height >= self.list_offset + self.list_height
    }
}

/// What a call to the feed did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PageOutcome {
    /// Guard was closed (fetch in flight, feed exhausted, or not at bottom).
    Skipped,
    Appended { page: u32, added: usize, total: usize },
    Exhausted { page: u32, total: usize },
    Failed { page: u32, error: String },
    /// The feed was reinitialized while this page was in flight.
    Discarded { page: u32 },
}

/// Point-in-time view of the feed for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedSnapshot {
    pub items: Vec<CatalogItem>,
    pub next_page: u32,
    pub exhausted: bool,
    pub fetch_in_flight: bool,
}

#[derive(Debug)]
struct FeedState {
    items: Vec<CatalogItem>,
    next_page: u32,
    exhausted: bool,
    fetch_in_flight: bool,
    epoch: u64,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_page: 1,
            exhausted: false,
            fetch_in_flight: false,
            epoch: 0,
        }
    }
}

struct PageTicket {
    page: u32,
    epoch: u64,
}

impl FeedState {
    fn begin_fetch(&mut self) -> Option<PageTicket> {
        if self.exhausted || self.fetch_in_flight {
            return None;
        }
        self.fetch_in_flight = true;
        Some(PageTicket {
            page: self.next_page,
            epoch: self.epoch,
        })
    }

    fn finish_fetch(
        &mut self,
        ticket: &PageTicket,
        outcome: anyhow::Result<Vec<CatalogItem>>,
    ) -> PageOutcome {
        if ticket.epoch != self.epoch {
            return PageOutcome::Discarded { page: ticket.page };
        }
        self.fetch_in_flight = false;
        match outcome {
            Ok(batch) if batch.is_empty() => {
                self.exhausted = true;
                PageOutcome::Exhausted {
                    page: ticket.page,
                    total: self.items.len(),
                }
            }
            Ok(batch) => {
                let added = batch.len();
                self.items.extend(batch);
                self.next_page += 1;
                PageOutcome::Appended {
                    page: ticket.page,
                    added,
                    total: self.items.len(),
                }
            }
            Err(e) => PageOutcome::Failed {
                page: ticket.page,
                error: format!("{:#}", e),
            },
        }
    }

    fn reset(&mut self) {
        self.items.clear();
        self.next_page = 1;
        self.exhausted = false;
        self.fetch_in_flight = false;
        self.epoch += 1;
    }

    fn snapshot(&self) -> FeedSnapshot {
        FeedSnapshot {
            items: self.items.clone(),
            next_page: self.next_page,
            exhausted: self.exhausted,
            fetch_in_flight: self.fetch_in_flight,
        }
    }
}

/// The paginated scroll feed.
pub struct ScrollFeed {
    catalog: Arc<dyn CatalogService>,
    state: Mutex<FeedState>,
}

impl ScrollFeed {
    /// Creates an empty feed. Nothing is fetched until the first
    /// [`reinitialize`](ScrollFeed::reinitialize) or page request.
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog,
            state: Mutex::new(FeedState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetches the next page unless one is already in flight or the feed
    /// is exhausted.
    pub async fn request_next_page(&self) -> PageOutcome {
        let ticket = self.state().begin_fetch();
        let Some(ticket) = ticket else {
            return PageOutcome::Skipped;
        };

        debug!(page = ticket.page, "fetching catalog page");
        let response = self.catalog.fetch_catalog_page(ticket.page).await;
        let outcome = self.state().finish_fetch(&ticket, response);

        match &outcome {
            PageOutcome::Exhausted { page, total } => {
                info!(page, total, "catalog feed exhausted")
            }
            PageOutcome::Failed { page, error } => {
                warn!(page, "catalog page fetch failed: {}", error)
            }
            PageOutcome::Discarded { page } => {
                debug!(page, "discarding page fetched before reinitialization")
            }
            _ => {}
        }
        outcome
    }

    /// Scroll observer hook: requests the next page when the list bottom
    /// is in view.
    pub async fn on_scroll(&self, position: ScrollPosition) -> PageOutcome {
        if !position.reached_bottom() {
            return PageOutcome::Skipped;
        }
        self.request_next_page().await
    }

    /// Clears the feed, resets the cursor to page 1 and eagerly fetches it.
    pub async fn reinitialize(&self) -> PageOutcome {
        self.state().reset();
        info!("catalog feed reinitialized");
        self.request_next_page().await
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        self.state().snapshot()
    }

    pub fn is_exhausted(&self) -> bool {
        self.state().exhausted
    }
}
