//! Debounced, self-superseding typeahead lookups.
//!
//! A [`Typeahead`] turns a live sequence of raw input values (one per
//! keystroke) into result batches for the latest input only:
//!
//! 1. **Coalesce**: a value is forwarded only after the input has been
//!    quiet for the configured window (400 ms by default).
//! 2. **Deduplicate**: a coalesced value equal to the previously forwarded
//!    one is dropped.
//! 3. **Supersede**: every forwarded value bumps a generation counter and
//!    dispatches one lookup tagged with that generation. A completion whose
//!    generation is no longer the latest is discarded on arrival; nothing is
//!    aborted.
//!
//! Failed lookups clear `loading` and leave the previous results in place.
//! An empty input is forwarded like any other value.
//!
//! The driver runs as a single tokio task, so all state transitions happen
//! one at a time even though lookups overlap.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::catalog::CatalogService;
use crate::models::Candidate;

/// Quiet window used when none is configured.
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(400);

/// Backend lookup driven by a [`Typeahead`].
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Short name used in log events (e.g. `"people"`).
    fn name(&self) -> &str;

    async fn lookup(&self, text: &str) -> Result<Vec<Candidate>>;
}

/// Person search over a [`CatalogService`].
pub struct PersonLookup {
    catalog: Arc<dyn CatalogService>,
}

impl PersonLookup {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl CandidateSource for PersonLookup {
    fn name(&self) -> &str {
        "people"
    }

    async fn lookup(&self, text: &str) -> Result<Vec<Candidate>> {
        self.catalog.find_person_by_name(text).await
    }
}

/// Title search over a [`CatalogService`].
pub struct TitleLookup {
    catalog: Arc<dyn CatalogService>,
}

impl TitleLookup {
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl CandidateSource for TitleLookup {
    fn name(&self) -> &str {
        "titles"
    }

    async fn lookup(&self, text: &str) -> Result<Vec<Candidate>> {
        self.catalog.find_title_by_name(text).await
    }
}

/// Results of one forwarded query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResultSet {
    /// Generation of the query that produced these results.
    pub generation: u64,
    pub query: String,
    pub candidates: Vec<Candidate>,
}

/// Point-in-time view of a [`Typeahead`] for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeaheadSnapshot {
    pub loading: bool,
    /// Last value forwarded to the backend.
    pub latest_query: Option<String>,
    /// Most recently delivered results, if any.
    pub results: Option<SearchResultSet>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Ticket {
    generation: u64,
    query: String,
}

enum Completion {
    Delivered(SearchResultSet),
    Failed(anyhow::Error),
    Stale,
}

#[derive(Debug, Default)]
struct TypeaheadState {
    last_forwarded: Option<String>,
    generation: u64,
    loading: bool,
    results: Option<SearchResultSet>,
}

impl TypeaheadState {
    /// Registers a coalesced value. `None` when it repeats the last one.
    fn forward(&mut self, value: String) -> Option<Ticket> {
        if self.last_forwarded.as_deref() == Some(value.as_str()) {
            return None;
        }
        self.last_forwarded = Some(value.clone());
        self.generation += 1;
        self.loading = true;
        Some(Ticket {
            generation: self.generation,
            query: value,
        })
    }

    fn complete(&mut self, ticket: &Ticket, outcome: Result<Vec<Candidate>>) -> Completion {
        if ticket.generation != self.generation {
            return Completion::Stale;
        }
        self.loading = false;
        match outcome {
            Ok(candidates) => {
                let set = SearchResultSet {
                    generation: ticket.generation,
                    query: ticket.query.clone(),
                    candidates,
                };
                self.results = Some(set.clone());
                Completion::Delivered(set)
            }
            Err(e) => Completion::Failed(e),
        }
    }

    fn snapshot(&self) -> TypeaheadSnapshot {
        TypeaheadSnapshot {
            loading: self.loading,
            latest_query: self.last_forwarded.clone(),
            results: self.results.clone(),
        }
    }
}

fn lock(state: &Mutex<TypeaheadState>) -> MutexGuard<'_, TypeaheadState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a running typeahead stream.
///
/// Must be created inside a tokio runtime. Dropping the handle stops the
/// stream immediately; [`finish`](Typeahead::finish) lets a pending value
/// and in-flight lookups settle first.
pub struct Typeahead {
    name: String,
    input: mpsc::UnboundedSender<String>,
    state: Arc<Mutex<TypeaheadState>>,
    task: Option<JoinHandle<()>>,
}

impl Typeahead {
    /// Starts a stream over `source`. Delivered result sets arrive on the
    /// returned receiver, newest query only.
    pub fn spawn(
        source: Arc<dyn CandidateSource>,
        quiet: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SearchResultSet>) {
        let (input, input_rx) = mpsc::unbounded_channel();
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(TypeaheadState::default()));
        let name = source.name().to_string();
        let task = tokio::spawn(drive(source, quiet, state.clone(), input_rx, results_tx));
        (
            Self {
                name,
                input,
                state,
                task: Some(task),
            },
            results_rx,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Feeds one raw input value (the full text after an edit).
    pub fn push(&self, text: impl Into<String>) {
        if self.input.send(text.into()).is_err() {
            warn!(stream = %self.name, "typeahead input dropped: stream has stopped");
        }
    }

    pub fn snapshot(&self) -> TypeaheadSnapshot {
        lock(&self.state).snapshot()
    }

    /// Closes the input and waits for the pending value and every
    /// in-flight lookup to settle.
    pub async fn finish(mut self) {
        let task = self.task.take();
        drop(self);
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("typeahead task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for Typeahead {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn drive(
    source: Arc<dyn CandidateSource>,
    quiet: Duration,
    state: Arc<Mutex<TypeaheadState>>,
    mut input: mpsc::UnboundedReceiver<String>,
    results: mpsc::UnboundedSender<SearchResultSet>,
) {
    let name = source.name().to_string();
    let mut pending: Option<(String, Instant)> = None;
    let mut in_flight: JoinSet<(Ticket, Result<Vec<Candidate>>)> = JoinSet::new();
    let mut input_open = true;

    loop {
        let deadline = pending.as_ref().map(|(_, at)| *at);
        tokio::select! {
            edit = input.recv(), if input_open => match edit {
                Some(value) => pending = Some((value, Instant::now() + quiet)),
                None => input_open = false,
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                let Some((value, _)) = pending.take() else { continue };
                let ticket = lock(&state).forward(value);
                match ticket {
                    Some(ticket) => {
                        debug!(stream = %name, generation = ticket.generation, query = %ticket.query, "dispatching lookup");
                        let source = source.clone();
                        in_flight.spawn(async move {
                            let outcome = source.lookup(&ticket.query).await;
                            (ticket, outcome)
                        });
                    }
                    None => debug!(stream = %name, "input unchanged since last lookup, skipped"),
                }
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => match joined {
                Ok((ticket, outcome)) => {
                    let completion = lock(&state).complete(&ticket, outcome);
                    match completion {
                        Completion::Delivered(set) => {
                            debug!(stream = %name, generation = set.generation, count = set.candidates.len(), "lookup delivered");
                            let _ = results.send(set);
                        }
                        Completion::Failed(e) => {
                            warn!(stream = %name, query = %ticket.query, "lookup failed: {:#}", e);
                        }
                        Completion::Stale => {
                            debug!(stream = %name, generation = ticket.generation, "discarding superseded lookup");
                        }
                    }
                }
                Err(e) => warn!(stream = %name, "lookup task failed: {}", e),
            },
            else => break,
        }
    }
}
