//! `scout people`, `scout titles` and `scout watch`.
//!
//! One-shot lookups push a single value through a typeahead stream and
//! wait for it to settle. `watch` treats every stdin line as the full
//! input text after a keystroke, so bursts of lines are debounced and
//! deduplicated exactly like typing.

use std::sync::Arc;

use anyhow::Result;
use clap::ValueEnum;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use movie_scout_core::catalog::CatalogService;
use movie_scout_core::typeahead::{
    CandidateSource, PersonLookup, SearchResultSet, TitleLookup, Typeahead,
};

use crate::backend::connect;
use crate::config::Config;
use crate::render::{print_candidates, print_json};

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum LookupKind {
    People,
    Titles,
}

impl LookupKind {
    pub fn source(self, catalog: Arc<dyn CatalogService>) -> Arc<dyn CandidateSource> {
        match self {
            LookupKind::People => Arc::new(PersonLookup::new(catalog)),
            LookupKind::Titles => Arc::new(TitleLookup::new(catalog)),
        }
    }
}

pub async fn run_lookup(config: &Config, kind: LookupKind, query: &str, json: bool) -> Result<()> {
    let backend = connect(config)?;
    let (typeahead, mut results) = Typeahead::spawn(
        kind.source(backend.catalog),
        config.typeahead.quiet_window(),
    );
    typeahead.push(query);
    typeahead.finish().await;

    let latest = drain(&mut results).await.pop();
    match latest {
        Some(set) => print_result_set(&set, json, false),
        None if json => print_json(&Vec::<()>::new()),
        None => {
            println!("No results.");
            Ok(())
        }
    }
}

pub async fn run_watch(config: &Config, kind: LookupKind, json: bool) -> Result<()> {
    let backend = connect(config)?;
    let (typeahead, mut results) = Typeahead::spawn(
        kind.source(backend.catalog),
        config.typeahead.quiet_window(),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(text) => typeahead.push(text),
                None => break,
            },
            Some(set) = results.recv() => print_result_set(&set, json, true)?,
        }
    }

    typeahead.finish().await;
    for set in drain(&mut results).await {
        print_result_set(&set, json, true)?;
    }
    Ok(())
}

async fn drain(results: &mut mpsc::UnboundedReceiver<SearchResultSet>) -> Vec<SearchResultSet> {
    let mut sets = Vec::new();
    while let Some(set) = results.recv().await {
        sets.push(set);
    }
    sets
}

fn print_result_set(set: &SearchResultSet, json: bool, streaming: bool) -> Result<()> {
    if json {
        if streaming {
            println!("{}", serde_json::to_string(set)?);
            return Ok(());
        }
        return print_json(&set.candidates);
    }
    if streaming {
        println!("# {} ({})", set.query, set.candidates.len());
    }
    print_candidates(&set.candidates);
    Ok(())
}
