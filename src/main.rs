//! # Movie Scout CLI (`scout`)
//!
//! ## Usage
//!
//! ```bash
//! scout --config ./config/scout.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scout people <name>` | Look up people by name |
//! | `scout titles <text>` | Look up catalog titles by name |
//! | `scout watch <people\|titles>` | Debounced lookups over stdin lines |
//! | `scout browse` | Page through the catalog feed |
//! | `scout categories` | List categories |
//! | `scout category <id>` | List the titles of one category |
//! | `scout import <query>` | Search the external source, optionally import |
//! | `scout open <id>` | Print the detail route of a title |

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use movie_scout::backend::{connect, StdoutNavigator};
use movie_scout::config::{self, Config};
use movie_scout::lookup::LookupKind;
use movie_scout::progress::ProgressMode;
use movie_scout::{browse, categories, import_cmd, logging, lookup};
use movie_scout_core::controller::SearchController;

/// Movie Scout: search, browse and import titles in a movie catalog.
#[derive(Parser)]
#[command(name = "scout", version)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/scout.toml")]
    config: PathBuf,

    /// Debug logging for both crates (ignored when RUST_LOG is set).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up people by name.
    People {
        name: String,
        #[arg(long)]
        json: bool,
    },

    /// Look up catalog titles by name.
    Titles {
        text: String,
        #[arg(long)]
        json: bool,
    },

    /// Feed stdin lines through a debounced typeahead.
    ///
    /// Each line is the full input text after one keystroke. Only the
    /// newest settled value is looked up; results print as they arrive.
    Watch {
        #[arg(value_enum)]
        kind: LookupKind,
        #[arg(long)]
        json: bool,
    },

    /// Page through the catalog feed.
    ///
    /// Requires a logged-in session (a configured token for the http
    /// backend).
    Browse {
        /// Stop after this many pages.
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        pages: Option<u32>,

        /// Progress output on stderr. Defaults to human when stderr is a TTY.
        #[arg(long, value_enum)]
        progress: Option<ProgressMode>,

        #[arg(long)]
        json: bool,
    },

    /// List categories.
    Categories {
        #[arg(long)]
        json: bool,
    },

    /// List the titles of one category.
    Category {
        id: i64,
        #[arg(long)]
        json: bool,
    },

    /// Search the external source for a title and optionally import it.
    Import {
        query: String,

        /// Import the candidate with this ordinal from the search results.
        #[arg(long)]
        pick: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Print the detail route of a title.
    Open { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // `open` needs no catalog, so it runs without a config file too
    let cfg = match &cli.command {
        Commands::Open { .. } => {
            config::load_config(&cli.config).unwrap_or_else(|_| Config::minimal())
        }
        _ => config::load_config(&cli.config)?,
    };
    logging::init_logging(&cfg.logging.filter, cli.verbose)?;

    match cli.command {
        Commands::People { name, json } => {
            lookup::run_lookup(&cfg, LookupKind::People, &name, json).await?;
        }
        Commands::Titles { text, json } => {
            lookup::run_lookup(&cfg, LookupKind::Titles, &text, json).await?;
        }
        Commands::Watch { kind, json } => {
            lookup::run_watch(&cfg, kind, json).await?;
        }
        Commands::Browse {
            pages,
            progress,
            json,
        } => {
            let progress = progress.unwrap_or_else(ProgressMode::default_for_tty);
            browse::run_browse(&cfg, pages, progress, json).await?;
        }
        Commands::Categories { json } => {
            categories::run_categories(&cfg, json).await?;
        }
        Commands::Category { id, json } => {
            categories::run_category(&cfg, id, json).await?;
        }
        Commands::Import { query, pick, json } => {
            import_cmd::run_import(&cfg, &query, pick, json).await?;
        }
        Commands::Open { id } => {
            let backend = connect(&cfg)?;
            let (controller, _streams) = SearchController::new(
                backend.catalog,
                backend.session,
                Arc::new(StdoutNavigator),
                cfg.typeahead.quiet_window(),
            );
            controller.navigate_to_detail(id);
        }
    }

    Ok(())
}
