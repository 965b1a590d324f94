//! Command handlers for shopkeep CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod configure;
pub mod generate;
pub mod inspect;
pub mod preview;
pub mod scrolls;

use shopkeep::Rarity;
use std::collections::BTreeMap;

/// "common: 12, uncommon: 3"
pub(crate) fn format_rarities(counts: &BTreeMap<Rarity, usize>) -> String {
    if counts.is_empty() {
        return "none".to_string();
    }
    counts
        .iter()
        .map(|(rarity, n)| format!("{}: {}", rarity, n))
        .collect::<Vec<_>>()
        .join(", ")
}
