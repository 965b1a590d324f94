//! Restock preview command
//!
//! Rolls a generated table the way the GM would in Foundry, with
//! replacement, and tallies what ends up on the shelf.

use crate::file_utils::read_table;
use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shopkeep::RollTable;
use std::collections::BTreeMap;
use std::path::Path;

/// Roll `count` times and count how often each entry came up
pub fn roll<R: Rng>(table: &RollTable, rng: &mut R, count: usize) -> BTreeMap<String, usize> {
    let drawn = table.draw(rng, count);
    if drawn.len() < count {
        tracing::warn!(
            "{}: {} of {} rolls matched no result",
            table.name,
            count - drawn.len(),
            count
        );
    }

    let mut tally = BTreeMap::new();
    for result in drawn {
        *tally.entry(result.name.clone()).or_insert(0) += 1;
    }
    tally
}

/// Handle the preview command
pub fn handle(path: &Path, rolls: usize, seed: Option<u64>) -> Result<()> {
    let table = read_table(path)?;
    if table.total_weight() == 0 {
        bail!("{} has no results to roll", path.display());
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    println!("{} ({}, {} entries)", table.name, table.formula, table.results.len());
    println!("Rolling {} times:\n", rolls);

    for (name, n) in roll(&table, &mut rng, rolls) {
        if n > 1 {
            println!("  {} x{}", name, n);
        } else {
            println!("  {}", name);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopkeep::{ItemKind, ItemRecord, Rarity, SequentialIds, TableBuilder, TableOptions};

    fn table() -> RollTable {
        let items = [
            ItemRecord::new("a", "Rope", ItemKind::Equipment),
            ItemRecord::new("b", "Grappling Hook", ItemKind::Equipment).with_rarity(Rarity::Rare),
        ];
        let refs: Vec<&ItemRecord> = items.iter().collect();
        TableBuilder::default()
            .build(&refs, &TableOptions::new("Gear"), &mut SequentialIds::default())
            .unwrap()
    }

    #[test]
    fn test_roll_counts_every_draw() {
        let mut rng = StdRng::seed_from_u64(7);
        let tally = roll(&table(), &mut rng, 50);
        assert_eq!(tally.values().sum::<usize>(), 50);
        assert!(tally.keys().all(|k| k == "Rope" || k == "Grappling Hook"));
    }

    #[test]
    fn test_gapped_table_yields_fewer_draws() {
        let mut table = table();
        // Rope keeps [1,4]; rolls 5..=8 now fall in a gap
        table.results[1].range = [9, 9];
        let tally = roll(&table, &mut StdRng::seed_from_u64(3), 200);
        assert!(tally.values().sum::<usize>() < 200);
    }

    #[test]
    fn test_seeded_rolls_repeat() {
        let table = table();
        let a = roll(&table, &mut StdRng::seed_from_u64(42), 20);
        let b = roll(&table, &mut StdRng::seed_from_u64(42), 20);
        assert_eq!(a, b);
    }
}
