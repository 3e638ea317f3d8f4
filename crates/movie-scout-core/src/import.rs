//! Two-phase "find then confirm" import of an external title.
//!
//! ```text
//!  Idle ─submit─▶ Searching ─matches─▶ CandidatesReady ─select(n)─▶ Importing ─confirmed─▶ Done
//!                     │                                                 │
//!                     └─────error─────▶ Failed ◀───declined / error─────┘
//! ```
//!
//! Any phase accepts a fresh submission, which discards the current
//! candidates outright. Each submission and selection carries a
//! generation; a response that comes back after a newer submission is
//! ignored.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::CatalogService;
use crate::models::ImportCandidate;

/// Replaces spaces with the `+` separator expected by the import backend.
///
/// ```rust
/// use movie_scout_core::import::normalize_query;
///
/// assert_eq!(normalize_query("the big lebowski"), "the+big+lebowski");
/// ```
pub fn normalize_query(text: &str) -> String {
    text.replace(' ', "+")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportPhase {
    Idle,
    Searching,
    CandidatesReady,
    Importing,
    Done,
    Failed,
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ImportPhase::Idle => "idle",
            ImportPhase::Searching => "searching",
            ImportPhase::CandidatesReady => "candidates-ready",
            ImportPhase::Importing => "importing",
            ImportPhase::Done => "done",
            ImportPhase::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Caller mistakes when selecting a candidate.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("no candidates to select from (import is {0})")]
    NotReady(ImportPhase),
    #[error("candidate {ordinal} does not exist ({available} available)")]
    UnknownOrdinal { ordinal: usize, available: usize },
}

/// Point-in-time view of the import session for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSnapshot {
    pub phase: ImportPhase,
    pub loading: bool,
    /// Normalized query of the current session.
    pub query: Option<String>,
    pub candidates: Vec<ImportCandidate>,
    /// Why the session is [`ImportPhase::Failed`].
    pub failure: Option<String>,
}

#[derive(Debug)]
struct ImportSession {
    phase: ImportPhase,
    loading: bool,
    query: Option<String>,
    candidates: Vec<ImportCandidate>,
    failure: Option<String>,
    generation: u64,
}

impl Default for ImportSession {
    fn default() -> Self {
        Self {
            phase: ImportPhase::Idle,
            loading: false,
            query: None,
            candidates: Vec::new(),
            failure: None,
            generation: 0,
        }
    }
}

impl ImportSession {
    fn fail(&mut self, reason: String) {
        self.phase = ImportPhase::Failed;
        self.loading = false;
        self.failure = Some(reason);
    }
}

pub struct ImportWorkflow {
    catalog: Arc<dyn CatalogService>,
    session: Mutex<ImportSession>,
}

impl ImportWorkflow {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog,
            session: Mutex::new(ImportSession::default()),
        }
    }

    fn session(&self) -> MutexGuard<'_, ImportSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Phase 1: search the external source for `text`.
    ///
    /// Returns the phase the session is in once the search settles.
    pub async fn submit_query(&self, text: &str) -> ImportPhase {
        let query = normalize_query(text);
        let generation = {
            let mut session = self.session();
            session.generation += 1;
            session.phase = ImportPhase::Searching;
            session.loading = true;
            session.query = Some(query.clone());
            session.candidates.clear();
            session.failure = None;
            session.generation
        };

        debug!(query = %query, "searching external titles");
        let response = self.catalog.search_external_title(&query).await;

        let mut session = self.session();
        if session.generation != generation {
            debug!(query = %query, "discarding superseded import search");
            return session.phase;
        }
        match response {
            Ok(titles) => {
                session.candidates = ImportCandidate::number(titles);
                session.phase = ImportPhase::CandidatesReady;
                session.loading = false;
                debug!(count = session.candidates.len(), "import candidates ready");
            }
            Err(e) => {
                warn!(query = %query, "import search failed: {:#}", e);
                session.fail(format!("search failed: {:#}", e));
            }
        }
        session.phase
    }

    /// Phase 2: import the candidate at `ordinal`.
    ///
    /// The candidate list is cleared before the backend is called. A
    /// declined or failed confirmation ends in [`ImportPhase::Failed`];
    /// submit a new query to retry.
    pub async fn select_candidate(&self, ordinal: usize) -> Result<ImportPhase, ImportError> {
        let (query, generation) = {
            let mut session = self.session();
            if session.phase != ImportPhase::CandidatesReady {
                return Err(ImportError::NotReady(session.phase));
            }
            let available = session.candidates.len();
            if ordinal >= available {
                return Err(ImportError::UnknownOrdinal { ordinal, available });
            }
            let Some(query) = session.query.clone() else {
                return Err(ImportError::NotReady(session.phase));
            };
            session.generation += 1;
            session.candidates.clear();
            session.phase = ImportPhase::Importing;
            session.loading = true;
            (query, session.generation)
        };

        debug!(query = %query, ordinal, "confirming import");
        let response = self.catalog.confirm_import(&query, ordinal).await;

        let mut session = self.session();
        if session.generation != generation {
            debug!(query = %query, ordinal, "discarding superseded import confirmation");
            return Ok(session.phase);
        }
        match response {
            Ok(true) => {
                session.phase = ImportPhase::Done;
                session.loading = false;
                info!(query = %query, ordinal, "title imported");
            }
            Ok(false) => {
                warn!(query = %query, ordinal, "import was not confirmed");
                session.fail("the catalog did not confirm the import".to_string());
            }
            Err(e) => {
                warn!(query = %query, ordinal, "import confirmation failed: {:#}", e);
                session.fail(format!("import failed: {:#}", e));
            }
        }
        Ok(session.phase)
    }

    pub fn phase(&self) -> ImportPhase {
        self.session().phase
    }

    pub fn snapshot(&self) -> ImportSnapshot {
        let session = self.session();
        ImportSnapshot {
            phase: session.phase,
            loading: session.loading,
            query: session.query.clone(),
            candidates: session.candidates.clone(),
            failure: session.failure.clone(),
        }
    }
}
