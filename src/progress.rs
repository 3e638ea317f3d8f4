//! Feed paging progress reporting.
//!
//! `scout browse` can take a while against a slow catalog, one request per
//! page. Progress goes to **stderr** so stdout stays parseable when
//! `--json` is used.

use std::io::Write;

use clap::ValueEnum;
use movie_scout_core::feed::PageOutcome;

/// A single progress event while paging the feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedProgressEvent {
    /// A page request is about to go out.
    Fetching { page: u32 },
    /// A page arrived and was appended.
    Appended { page: u32, added: usize, total: usize },
    /// The catalog answered with an empty page; no further requests.
    Exhausted { page: u32, total: usize },
    /// The page request failed; the same page will be retried next time.
    Failed { page: u32, error: String },
}

impl FeedProgressEvent {
    /// Maps a feed outcome to a progress event. Skipped and discarded
    /// requests are not reported.
    pub fn from_outcome(outcome: &PageOutcome) -> Option<Self> {
        match outcome {
            PageOutcome::Appended { page, added, total } => Some(Self::Appended {
                page: *page,
                added: *added,
                total: *total,
            }),
            PageOutcome::Exhausted { page, total } => Some(Self::Exhausted {
                page: *page,
                total: *total,
            }),
            PageOutcome::Failed { page, error } => Some(Self::Failed {
                page: *page,
                error: error.clone(),
            }),
            PageOutcome::Skipped | PageOutcome::Discarded { .. } => None,
        }
    }
}

pub trait FeedProgressReporter: Send + Sync {
    fn report(&self, event: FeedProgressEvent);
}

/// Human-friendly progress on stderr: "browse  page 3  +10  (30 items)".
pub struct StderrProgress;

impl FeedProgressReporter for StderrProgress {
    fn report(&self, event: FeedProgressEvent) {
        let line = match &event {
            FeedProgressEvent::Fetching { page } => format!("browse  page {}  fetching...\n", page),
            FeedProgressEvent::Appended { page, added, total } => format!(
                "browse  page {}  +{}  ({} items)\n",
                page,
                format_number(*added as u64),
                format_number(*total as u64)
            ),
            FeedProgressEvent::Exhausted { page, total } => format!(
                "browse  page {}  empty, catalog exhausted  ({} items)\n",
                page,
                format_number(*total as u64)
            ),
            FeedProgressEvent::Failed { page, error } => {
                format!("browse  page {}  failed: {}\n", page, error)
            }
        };
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl JsonProgress {
    fn to_json(event: &FeedProgressEvent) -> serde_json::Value {
        match event {
            FeedProgressEvent::Fetching { page } => serde_json::json!({
                "event": "progress",
                "phase": "fetching",
                "page": page
            }),
            FeedProgressEvent::Appended { page, added, total } => serde_json::json!({
                "event": "progress",
                "phase": "appended",
                "page": page,
                "added": added,
                "total": total
            }),
            FeedProgressEvent::Exhausted { page, total } => serde_json::json!({
                "event": "progress",
                "phase": "exhausted",
                "page": page,
                "total": total
            }),
            FeedProgressEvent::Failed { page, error } => serde_json::json!({
                "event": "progress",
                "phase": "failed",
                "page": page,
                "error": error
            }),
        }
    }
}

impl FeedProgressReporter for JsonProgress {
    fn report(&self, event: FeedProgressEvent) {
        if let Ok(line) = serde_json::to_string(&Self::to_json(&event)) {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{}", line);
            let _ = stderr.flush();
        }
    }
}

pub struct NoProgress;

impl FeedProgressReporter for NoProgress {
    fn report(&self, _event: FeedProgressEvent) {}
}

pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Progress mode for `scout browse --progress`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn FeedProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
