//! `scout import <query> [--pick N]`.
//!
//! Without `--pick` only the search runs and the numbered candidates are
//! printed. With `--pick N` the candidate at ordinal `N` of that same
//! search is confirmed right away.

use anyhow::{bail, Result};

use movie_scout_core::import::{ImportPhase, ImportWorkflow};

use crate::backend::connect;
use crate::config::Config;
use crate::render::{print_import_candidates, print_json};

pub async fn run_import(config: &Config, query: &str, pick: Option<usize>, json: bool) -> Result<()> {
    let backend = connect(config)?;
    let workflow = ImportWorkflow::new(backend.catalog);

    let phase = workflow.submit_query(query).await;
    if phase != ImportPhase::CandidatesReady {
        bail!("Import search ended {}: {}", phase, failure(&workflow));
    }

    let Some(ordinal) = pick else {
        let snapshot = workflow.snapshot();
        return if json {
            print_json(&snapshot.candidates)
        } else {
            print_import_candidates(&snapshot.candidates);
            Ok(())
        };
    };

    let chosen = workflow
        .snapshot()
        .candidates
        .into_iter()
        .find(|c| c.ordinal == ordinal);
    match workflow.select_candidate(ordinal).await? {
        ImportPhase::Done => {
            if json {
                print_json(&workflow.snapshot())?;
            } else if let Some(chosen) = chosen {
                println!("Imported: {}", chosen.title.title);
            }
            Ok(())
        }
        phase => bail!("Import ended {}: {}", phase, failure(&workflow)),
    }
}

fn failure(workflow: &ImportWorkflow) -> String {
    workflow
        .snapshot()
        .failure
        .unwrap_or_else(|| "no reason given".to_string())
}
