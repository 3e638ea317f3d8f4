//! # Movie Scout
//!
//! Typeahead search, scroll browsing, category filtering and two-phase
//! title import for a movie catalog, driven from the command line.
//!
//! The state engine lives in [`movie_scout_core`]; this crate adds the
//! catalog backends, configuration, logging and the `scout` CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌────────────────┐
//! │  scout CLI   │──▶│ movie-scout-core │──▶│ CatalogService │
//! │ (commands)   │   │ typeahead / feed │   │ http | memory  │
//! └──────────────┘   │ overlay / import │   └────────────────┘
//!                    └──────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! scout people "harrison"              # debounced person lookup
//! scout browse --pages 3               # first three feed pages
//! scout category 28                    # titles in a category
//! scout import "blade runner"          # search the external source
//! scout import "blade runner" --pick 0 # import the first match
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`logging`] | Tracing subscriber setup |
//! | [`backend`] | Backend selection, session and navigation wiring |
//! | [`http_catalog`] | REST catalog client |
//! | [`progress`] | Feed paging progress on stderr |
//! | [`lookup`] | Person and title lookups |
//! | [`browse`] | Feed paging |
//! | [`categories`] | Category listing and filtering |
//! | [`import_cmd`] | External title import |
//! | [`render`] | Text and JSON output |

pub mod backend;
pub mod browse;
pub mod categories;
pub mod config;
pub mod http_catalog;
pub mod import_cmd;
pub mod logging;
pub mod lookup;
pub mod progress;
pub mod render;
