//! Plain-text and JSON output shared by the CLI commands.

use anyhow::Result;
use serde::Serialize;

use movie_scout_core::models::{Candidate, CatalogItem, Category, ImportCandidate};

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn year(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y").to_string())
        .unwrap_or_else(|| "----".to_string())
}

pub fn print_items(items: &[CatalogItem]) {
    if items.is_empty() {
        println!("No titles.");
        return;
    }
    for item in items {
        println!("{:>6}  {}  {}", item.id, year(item.release_date), item.title);
    }
}

pub fn print_candidates(candidates: &[Candidate]) {
    if candidates.is_empty() {
        println!("No results.");
        return;
    }
    for candidate in candidates {
        match candidate {
            Candidate::Person(p) => println!("{:>6}  person  {}", p.id, p.name),
            Candidate::Title(t) => {
                println!("{:>6}  title   {} ({})", t.id, t.title, year(t.release_date))
            }
        }
    }
}

pub fn print_categories(categories: &[Category]) {
    if categories.is_empty() {
        println!("No categories.");
        return;
    }
    println!("{:>6}  NAME", "ID");
    for category in categories {
        println!("{:>6}  {}", category.id, category.name);
    }
}

pub fn print_import_candidates(candidates: &[ImportCandidate]) {
    if candidates.is_empty() {
        println!("No matches in the external source.");
        return;
    }
    for candidate in candidates {
        println!(
            "[{}] {} ({})",
            candidate.ordinal,
            candidate.title.title,
            year(candidate.title.release_date)
        );
        if let Some(overview) = &candidate.title.overview {
            println!("    {}", overview);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn year_falls_back_to_dashes() {
        assert_eq!(year(None), "----");
        assert_eq!(year(NaiveDate::from_ymd_opt(1982, 6, 25)), "1982");
    }
}
