//! Scroll and wand table command

use crate::config::Config;
use crate::file_utils::write_table;
use anyhow::{anyhow, Context, Result};
use shopkeep::{build_scroll_table, load_spells, RandomIds, Rarity, ScrollQuery, SpellForm, Tradition};
use std::path::PathBuf;

/// Build a query from command-line values
pub fn query(
    rank: u32,
    wand: bool,
    tradition: Option<&str>,
    rarity: Option<&str>,
) -> Result<ScrollQuery> {
    let form = if wand { SpellForm::Wand } else { SpellForm::Scroll };
    let mut query = ScrollQuery::new(form, rank);

    if let Some(t) = tradition {
        query.tradition = Some(t.parse::<Tradition>().map_err(|e| anyhow!(e))?);
    }
    if let Some(r) = rarity {
        query.rarity = Some(r.parse::<Rarity>().map_err(|e| anyhow!(e))?);
    }

    query.validate()?;
    Ok(query)
}

/// Handle the scrolls command
pub fn handle(
    rank: u32,
    wand: bool,
    tradition: Option<&str>,
    rarity: Option<&str>,
    spells: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let query = query(rank, wand, tradition, rarity)?;

    let defaults = Config::load()?;
    let spells_dir = defaults.resolve_spells(spells)?;
    let output = output.unwrap_or_else(|| {
        defaults.resolve_output(None).join(format!(
            "{}-rank-{}.json",
            query.form.title().to_lowercase(),
            query.rank
        ))
    });

    let (spells, report) = load_spells(&spells_dir)
        .with_context(|| format!("Failed to load spells from {}", spells_dir.display()))?;
    println!(
        "Loaded {} spells from {} ({} skipped)",
        report.loaded,
        spells_dir.display(),
        report.skipped.len()
    );

    let table = build_scroll_table(&spells, &query, &mut RandomIds)?;
    write_table(&output, &table)?;

    println!("\n{}: {} entries", table.name, table.results.len());
    println!("  Formula: {}", table.formula);
    println!("  Saved: {}", output.display());

    Ok(())
}
