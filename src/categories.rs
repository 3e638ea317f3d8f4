//! `scout categories` and `scout category <id>`.

use anyhow::{Context, Result};

use movie_scout_core::overlay::CategoryOverlay;

use crate::backend::connect;
use crate::config::Config;
use crate::render::{print_categories, print_items, print_json};

pub async fn run_categories(config: &Config, json: bool) -> Result<()> {
    let backend = connect(config)?;
    let overlay = CategoryOverlay::new(backend.catalog);
    overlay
        .load_categories()
        .await
        .context("Failed to load categories")?;

    let categories = overlay.snapshot().categories;
    if json {
        print_json(&categories)
    } else {
        print_categories(&categories);
        Ok(())
    }
}

pub async fn run_category(config: &Config, id: i64, json: bool) -> Result<()> {
    let backend = connect(config)?;
    let overlay = CategoryOverlay::new(backend.catalog);
    overlay.toggle();
    overlay
        .select_category(id)
        .await
        .with_context(|| format!("Failed to load category {}", id))?;

    let items = overlay.snapshot().items;
    if json {
        print_json(&items)
    } else {
        print_items(&items);
        Ok(())
    }
}
