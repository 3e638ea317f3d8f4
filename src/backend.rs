//! Catalog backend selection and session wiring.
//!
//! | `[catalog].backend` | Implementation | Authenticated |
//! |---------------------|----------------|---------------|
//! | `"http"` | [`HttpCatalog`] | when a token is configured |
//! | `"memory"` | [`InMemoryCatalog`] | always |
//!
//! The token is read from `SCOUT_API_TOKEN` first, then `[catalog].token`.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{debug, info};

use movie_scout_core::catalog::memory::{CatalogFixture, InMemoryCatalog, DEFAULT_PAGE_SIZE};
use movie_scout_core::catalog::{detail_route, CatalogService, Navigator, SessionFlag};

use crate::config::{CatalogConfig, Config};
use crate::http_catalog::HttpCatalog;

pub const TOKEN_ENV: &str = "SCOUT_API_TOKEN";

/// A connected catalog plus the login state that goes with it.
pub struct Backend {
    pub catalog: Arc<dyn CatalogService>,
    pub session: Arc<SessionFlag>,
}

pub fn connect(config: &Config) -> Result<Backend> {
    match config.catalog.backend.as_str() {
        "http" => {
            let token = resolve_token(&config.catalog);
            let session = Arc::new(SessionFlag::new(token.is_some()));
            debug!(base_url = %config.catalog.base_url, authenticated = token.is_some(), "http catalog");
            let catalog = HttpCatalog::new(&config.catalog, token)?;
            Ok(Backend {
                catalog: Arc::new(catalog),
                session,
            })
        }
        "memory" => {
            let catalog = match &config.catalog.fixture {
                Some(path) => InMemoryCatalog::from_fixture(load_fixture(path)?),
                None => InMemoryCatalog::new(DEFAULT_PAGE_SIZE),
            };
            info!(items = catalog.len(), "in-memory catalog ready");
            Ok(Backend {
                catalog: Arc::new(catalog),
                session: Arc::new(SessionFlag::new(true)),
            })
        }
        other => bail!("Unknown catalog backend: {}", other),
    }
}

fn resolve_token(config: &CatalogConfig) -> Option<String> {
    pick_token(std::env::var(TOKEN_ENV).ok(), config.token.clone())
}

/// A blank value counts as unset at either level.
fn pick_token(from_env: Option<String>, configured: Option<String>) -> Option<String> {
    let usable = |t: &String| !t.trim().is_empty();
    from_env.filter(usable).or_else(|| configured.filter(usable))
}

pub fn load_fixture(path: &Path) -> Result<CatalogFixture> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog fixture: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog fixture: {}", path.display()))
}

/// Prints the detail route instead of switching views.
pub struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn navigate_to_detail(&self, item_id: i64) {
        println!("{}", detail_route(item_id));
    }
}
