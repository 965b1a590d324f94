//! Item matching against partition criteria

use crate::criteria::{Criteria, FixedCriteria, RotatingCriteria};
use crate::item::{ItemRecord, Rarity};

/// Whether an item belongs to the partition described by `criteria`
pub fn matches(item: &ItemRecord, criteria: &Criteria) -> bool {
    match criteria {
        Criteria::Fixed(fixed) => matches_fixed(item, fixed),
        Criteria::Rotating(rot) => matches_rotating(item, rot),
    }
}

/// All catalog items matching `criteria`, in catalog order
pub fn filter<'a, I>(items: I, criteria: &Criteria) -> Vec<&'a ItemRecord>
where
    I: IntoIterator<Item = &'a ItemRecord>,
{
    items
        .into_iter()
        .filter(|item| matches(item, criteria))
        .collect()
}

/// Inclusion-list matching.
///
/// Rarity and level gates apply first; after that only an exact name or a
/// name pattern admits the item.
pub fn matches_fixed(item: &ItemRecord, criteria: &FixedCriteria) -> bool {
    if criteria.common_only && item.rarity != Rarity::Common {
        return false;
    }

    if item.level > criteria.level_max {
        return false;
    }

    if criteria.names.contains(&item.name) {
        return true;
    }

    criteria
        .name_patterns
        .iter()
        .any(|pattern| item.name.contains(pattern.as_str()))
}

/// Category matching for rotating stock
pub fn matches_rotating(item: &ItemRecord, criteria: &RotatingCriteria) -> bool {
    if !criteria.level_range.contains(item.level) {
        return false;
    }

    if item.rarity == Rarity::Unique {
        return false;
    }

    if !criteria.kinds.contains(&item.kind) {
        return false;
    }

    if let Some(ceiling) = criteria.price_ceiling {
        if item.price > ceiling {
            return false;
        }
    }

    let accepted = has_override_marker(item, criteria) || passes_taxonomy(item, criteria);
    accepted && !fails_grade_filter(item, criteria)
}

/// Name markers bypass the trait and category checks entirely
fn has_override_marker(item: &ItemRecord, criteria: &RotatingCriteria) -> bool {
    if criteria.name_overrides.is_empty() {
        return false;
    }
    let name = item.name.to_lowercase();
    criteria
        .name_overrides
        .iter()
        .any(|marker| name.contains(&marker.to_lowercase()))
}

fn passes_taxonomy(item: &ItemRecord, criteria: &RotatingCriteria) -> bool {
    if criteria
        .exclude_traits
        .iter()
        .any(|t| item.has_trait(t))
    {
        return false;
    }

    let in_category = item
        .category
        .as_deref()
        .is_some_and(|c| criteria.category_enabled(c));

    if criteria.require_traits.is_empty() {
        // Exclusion-style partition: uncategorised items pass, categorised
        // ones need an enabled category.
        return item.category.is_none() || in_category;
    }

    let has_required = criteria.require_traits.iter().any(|t| item.has_trait(t));
    has_required || in_category
}

/// Minor and lesser grades are dropped when the item sits more than one
/// level below the reference level
fn fails_grade_filter(item: &ItemRecord, criteria: &RotatingCriteria) -> bool {
    if !criteria.grade_filter {
        return false;
    }
    let Some(reference) = criteria.reference_level else {
        return false;
    };
    item.level + 1 < reference && item.grade().is_low()
}
