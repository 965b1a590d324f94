//! Catalog summary command

use crate::config::Config;
use anyhow::{Context, Result};
use shopkeep::{rarity_breakdown, Catalog, LoadReport, Rarity};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Item counts for a loaded catalog
#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub by_kind: BTreeMap<String, usize>,
    pub by_level: BTreeMap<u32, usize>,
    /// Every rarity, including ones with no items
    pub by_rarity: Vec<(Rarity, usize)>,
    pub uncategorized: usize,
}

pub fn summarize(catalog: &Catalog) -> Summary {
    let mut summary = Summary::default();
    for item in catalog {
        *summary.by_kind.entry(item.kind.to_string()).or_insert(0) += 1;
        *summary.by_level.entry(item.level).or_insert(0) += 1;
        if item.category.is_none() {
            summary.uncategorized += 1;
        }
    }

    let rarities = rarity_breakdown(catalog);
    summary.by_rarity = Rarity::ALL
        .iter()
        .map(|r| (*r, rarities.get(r).copied().unwrap_or(0)))
        .collect();
    summary
}

/// Handle the inspect command
pub fn handle(catalog: Option<PathBuf>, show_skipped: bool) -> Result<()> {
    let dir = Config::load()?.resolve_catalog(catalog)?;
    let (catalog, report) = Catalog::load_dir(&dir)
        .with_context(|| format!("Failed to load catalog {}", dir.display()))?;

    println!("Catalog: {}", dir.display());
    println!("Items: {}", catalog.len());
    print_summary(&summarize(&catalog));
    print_skipped(&report, show_skipped);

    Ok(())
}

fn print_summary(summary: &Summary) {
    println!("\nBy type:");
    for (kind, n) in &summary.by_kind {
        println!("  {:<12} {}", kind, n);
    }

    println!("\nBy level:");
    for (level, n) in &summary.by_level {
        println!("  {:>3}  {}", level, n);
    }

    println!("\nBy rarity:");
    for (rarity, n) in &summary.by_rarity {
        println!("  {:<12} {}", rarity.tag(), n);
    }

    println!("\nWithout category: {}", summary.uncategorized);
}

fn print_skipped(report: &LoadReport, verbose: bool) {
    println!("Skipped files: {}", report.skipped.len());
    if verbose {
        for skipped in &report.skipped {
            println!("  {}: {}", skipped.path.display(), skipped.reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopkeep::{ItemKind, ItemRecord};

    #[test]
    fn test_summarize() {
        let catalog = Catalog::from_items(vec![
            ItemRecord::new("a", "Dagger", ItemKind::Weapon).with_category("simple"),
            ItemRecord::new("b", "Longsword", ItemKind::Weapon).with_category("martial"),
            ItemRecord::new("c", "Rope", ItemKind::Equipment).with_level(1),
        ]);
        let summary = summarize(&catalog);
        assert_eq!(summary.by_kind.get("weapon"), Some(&2));
        assert_eq!(summary.by_kind.get("equipment"), Some(&1));
        assert_eq!(summary.by_level.get(&0), Some(&2));
        assert_eq!(summary.by_level.get(&1), Some(&1));
        assert_eq!(summary.uncategorized, 1);
        assert_eq!(
            summary.by_rarity,
            vec![
                (Rarity::Common, 3),
                (Rarity::Uncommon, 0),
                (Rarity::Rare, 0),
                (Rarity::Unique, 0),
            ]
        );
    }
}
