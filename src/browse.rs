//! `scout browse`: page through the catalog feed.
//!
//! Enters the route like the UI would (categories load, the feed starts on
//! page 1 when logged in), then keeps asking for the next page the way a
//! scroll-to-bottom trigger does. Stops when the catalog is exhausted, a
//! page fails, or `--pages` pages have been fetched.

use std::sync::Arc;

use anyhow::{bail, Result};
use tracing::info;

use movie_scout_core::catalog::AuthSignal;
use movie_scout_core::controller::SearchController;
use movie_scout_core::feed::PageOutcome;

use crate::backend::{connect, StdoutNavigator, TOKEN_ENV};
use crate::config::Config;
use crate::progress::{FeedProgressEvent, ProgressMode};
use crate::render::{print_items, print_json};

pub async fn run_browse(
    config: &Config,
    max_pages: Option<u32>,
    progress: ProgressMode,
    json: bool,
) -> Result<()> {
    let backend = connect(config)?;
    if !backend.session.is_authenticated() {
        bail!(
            "Not logged in: set [catalog].token or {} to browse the catalog",
            TOKEN_ENV
        );
    }

    let (controller, _streams) = SearchController::new(
        backend.catalog,
        backend.session,
        Arc::new(StdoutNavigator),
        config.typeahead.quiet_window(),
    );
    let reporter = progress.reporter();

    reporter.report(FeedProgressEvent::Fetching { page: 1 });
    let Some(mut outcome) = controller.on_route_entry().await else {
        bail!("Session ended before the feed started");
    };
    let mut fetched = 1;

    loop {
        if let Some(event) = FeedProgressEvent::from_outcome(&outcome) {
            reporter.report(event);
        }
        match outcome {
            PageOutcome::Appended { .. } => {}
            PageOutcome::Failed { page, error } => {
                bail!("Failed to fetch page {}: {}", page, error);
            }
            PageOutcome::Exhausted { .. } | PageOutcome::Skipped | PageOutcome::Discarded { .. } => {
                break
            }
        }
        if matches!(max_pages, Some(n) if fetched >= n) {
            break;
        }
        let page = controller.feed().snapshot().next_page;
        reporter.report(FeedProgressEvent::Fetching { page });
        outcome = controller.request_next_page().await;
        fetched += 1;
    }

    let feed = controller.feed().snapshot();
    info!(
        items = feed.items.len(),
        exhausted = feed.exhausted,
        "browse finished"
    );
    if json {
        print_json(&feed)
    } else {
        print_items(&feed.items);
        if feed.exhausted {
            println!("-- end of catalog --");
        }
        Ok(())
    }
}
