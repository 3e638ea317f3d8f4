//! # Movie Scout Core
//!
//! The reactive query, pagination and import state engine behind Movie
//! Scout, plus the catalog data model and the [`catalog::CatalogService`]
//! seam every backend implements.
//!
//! This crate performs no network or filesystem I/O of its own. It needs a
//! tokio runtime only for the typeahead debounce timer and lookup tasks.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Catalog items, people, categories, import candidates |
//! | [`catalog`] | Backend trait, auth/navigation seams, in-memory catalog |
//! | [`typeahead`] | Debounced, self-superseding lookup stream |
//! | [`feed`] | Scroll-driven paginated feed |
//! | [`overlay`] | Category filter overlay |
//! | [`import`] | Two-phase external title import |
//! | [`controller`] | Composition of all of the above |

pub mod catalog;
pub mod controller;
pub mod feed;
pub mod import;
pub mod models;
pub mod overlay;
pub mod typeahead;
