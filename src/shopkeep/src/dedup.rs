//! Keeping partitions disjoint
//!
//! Always-available stock claims its items first; the rotating partition
//! drawn from the same catalog must not offer them again.

use crate::item::ItemRecord;
use std::collections::HashSet;

/// `candidates` minus every item whose id appears in `claimed`.
///
/// Candidate order is preserved.
pub fn exclude_claimed<'a>(
    claimed: &[&ItemRecord],
    candidates: Vec<&'a ItemRecord>,
) -> Vec<&'a ItemRecord> {
    if claimed.is_empty() {
        return candidates;
    }

    let claimed_ids: HashSet<&str> = claimed.iter().map(|item| item.id.as_str()).collect();
    let before = candidates.len();

    let remaining: Vec<&ItemRecord> = candidates
        .into_iter()
        .filter(|item| !claimed_ids.contains(item.id.as_str()))
        .collect();

    if remaining.len() != before {
        tracing::debug!(
            "Removed {} already-claimed items from partition",
            before - remaining.len()
        );
    }

    remaining
}
