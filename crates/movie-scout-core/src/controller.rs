//! The search-and-browse controller.
//!
//! [`SearchController`] owns one instance of every component: two
//! independent typeahead streams (people and titles), the scroll feed, the
//! category overlay and the import workflow. It wires them to the outside
//! world: the catalog backend, the login signal and navigation.
//!
//! # Lifecycle
//!
//! | Event | Effect |
//! |-------|--------|
//! | [`on_route_entry`](SearchController::on_route_entry) | load categories; start the feed if logged in |
//! | [`on_login_closed`](SearchController::on_login_closed) | restart the feed when the login was confirmed |
//! | [`on_session_restored`](SearchController::on_session_restored) | restart the feed |

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::catalog::{AuthSignal, CatalogService, Navigator};
use crate::feed::{FeedSnapshot, PageOutcome, ScrollFeed, ScrollPosition};
use crate::import::{ImportError, ImportPhase, ImportSnapshot, ImportWorkflow};
use crate::overlay::{CategoryOverlay, OverlaySnapshot};
use crate::typeahead::{
    PersonLookup, SearchResultSet, TitleLookup, Typeahead, TypeaheadSnapshot,
};

/// Result streams of the two typeahead instances.
pub struct ResultStreams {
    pub people: mpsc::UnboundedReceiver<SearchResultSet>,
    pub titles: mpsc::UnboundedReceiver<SearchResultSet>,
}

/// Everything the UI layer renders, captured at once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerSnapshot {
    pub people: TypeaheadSnapshot,
    pub titles: TypeaheadSnapshot,
    pub feed: FeedSnapshot,
    pub overlay: OverlaySnapshot,
    pub import: ImportSnapshot,
}

pub struct SearchController {
    people: Typeahead,
    titles: Typeahead,
    feed: ScrollFeed,
    overlay: CategoryOverlay,
    import: ImportWorkflow,
    auth: Arc<dyn AuthSignal>,
    navigator: Arc<dyn Navigator>,
}

impl SearchController {
    /// Builds the controller and starts both typeahead streams.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(
        catalog: Arc<dyn CatalogService>,
        auth: Arc<dyn AuthSignal>,
        navigator: Arc<dyn Navigator>,
        quiet_window: Duration,
    ) -> (Self, ResultStreams) {
        let (people, people_rx) =
            Typeahead::spawn(Arc::new(PersonLookup::new(catalog.clone())), quiet_window);
        let (titles, titles_rx) =
            Typeahead::spawn(Arc::new(TitleLookup::new(catalog.clone())), quiet_window);
        let controller = Self {
            people,
            titles,
            feed: ScrollFeed::new(catalog.clone()),
            overlay: CategoryOverlay::new(catalog.clone()),
            import: ImportWorkflow::new(catalog),
            auth,
            navigator,
        };
        let streams = ResultStreams {
            people: people_rx,
            titles: titles_rx,
        };
        (controller, streams)
    }

    /// Route entry: loads the category menu and, when logged in, starts
    /// the feed. Returns the first page's outcome if the feed started.
    ///
    /// A failed category load is logged by the overlay and does not stop
    /// the feed from starting.
    pub async fn on_route_entry(&self) -> Option<PageOutcome> {
        if let Err(e) = self.overlay.load_categories().await {
            debug!("starting without a category menu: {:#}", e);
        }
        if self.auth.is_authenticated() {
            Some(self.feed.reinitialize().await)
        } else {
            debug!("not logged in, scroll feed left idle");
            None
        }
    }

    /// The login dialog closed; `confirmed` is true for a successful login.
    pub async fn on_login_closed(&self, confirmed: bool) -> Option<PageOutcome> {
        if confirmed {
            Some(self.on_session_restored().await)
        } else {
            None
        }
    }

    /// The session restarted: clear the feed and fetch page 1 again.
    pub async fn on_session_restored(&self) -> PageOutcome {
        info!("session restored, restarting scroll feed");
        self.feed.reinitialize().await
    }

    pub fn person_input(&self, text: impl Into<String>) {
        self.people.push(text);
    }

    pub fn title_input(&self, text: impl Into<String>) {
        self.titles.push(text);
    }

    pub async fn request_next_page(&self) -> PageOutcome {
        self.feed.request_next_page().await
    }

    pub async fn on_scroll(&self, position: ScrollPosition) -> PageOutcome {
        self.feed.on_scroll(position).await
    }

    pub fn toggle(&self) -> bool {
        self.overlay.toggle()
    }

    pub async fn select_category(&self, id: i64) -> Result<()> {
        self.overlay.select_category(id).await
    }

    pub async fn submit_import_query(&self, text: &str) -> ImportPhase {
        self.import.submit_query(text).await
    }

    pub async fn select_import_candidate(&self, ordinal: usize) -> Result<ImportPhase, ImportError> {
        self.import.select_candidate(ordinal).await
    }

    pub fn navigate_to_detail(&self, item_id: i64) {
        self.navigator.navigate_to_detail(item_id);
    }

    pub fn people(&self) -> &Typeahead {
        &self.people
    }

    pub fn titles(&self) -> &Typeahead {
        &self.titles
    }

    pub fn feed(&self) -> &ScrollFeed {
        &self.feed
    }

    pub fn overlay(&self) -> &CategoryOverlay {
        &self.overlay
    }

    pub fn import(&self) -> &ImportWorkflow {
        &self.import
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            people: self.people.snapshot(),
            titles: self.titles.snapshot(),
            feed: self.feed.snapshot(),
            overlay: self.overlay.snapshot(),
            import: self.import.snapshot(),
        }
    }
}
