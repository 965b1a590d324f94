//! Partition criteria
//!
//! A partition is described by one of two criteria shapes:
//!
//! - [`FixedCriteria`]: an inclusion list for stock that is always present.
//!   Names and name patterns are the only positive triggers.
//! - [`RotatingCriteria`]: level/kind/price gates plus a trait and category
//!   taxonomy, for stock that is re-rolled on every visit.
//!
//! Criteria are plain immutable values. Call [`Criteria::validate`] before
//! filtering so configuration mistakes surface up front.

use crate::item::{ItemKind, Price};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CriteriaError {
    #[error("Trait '{0}' is both required and excluded")]
    ConflictingTrait(String),

    #[error("Invalid level range: min {min} is greater than max {max}")]
    InvalidLevelRange { min: u32, max: u32 },

    #[error("Rotating criteria must allow at least one item kind")]
    NoKinds,

    #[error("Fixed criteria need at least one name or name pattern")]
    NoInclusionTriggers,

    #[error("Grade filter is enabled but no reference level is set")]
    MissingReferenceLevel,
}

/// Inclusive level bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRange {
    pub min: u32,
    pub max: u32,
}

impl LevelRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, level: u32) -> bool {
        (self.min..=self.max).contains(&level)
    }
}

impl Default for LevelRange {
    fn default() -> Self {
        Self { min: 0, max: 25 }
    }
}

/// Inclusion-list criteria for always-available stock
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedCriteria {
    /// Highest item level allowed (inclusive). Dominates name matches.
    pub level_max: u32,
    /// Restrict to common rarity
    pub common_only: bool,
    /// Exact names that are always stocked
    pub names: BTreeSet<String>,
    /// Substrings; any match in the item name stocks the item
    pub name_patterns: Vec<String>,
}

/// Category criteria for rotating stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotatingCriteria {
    pub level_range: LevelRange,
    /// Item kinds eligible for the partition
    pub kinds: Vec<ItemKind>,
    /// Category tag → enabled
    pub categories: BTreeMap<String, bool>,
    /// At least one of these traits (OR)
    pub require_traits: BTreeSet<String>,
    /// None of these traits
    pub exclude_traits: BTreeSet<String>,
    /// Highest price allowed (inclusive); `None` means no cap
    pub price_ceiling: Option<Price>,
    /// Case-insensitive name markers that accept an item outright
    pub name_overrides: Vec<String>,
    /// Drop minor/lesser grades of items well below `reference_level`
    pub grade_filter: bool,
    /// Party level the grade filter compares against
    pub reference_level: Option<u32>,
}

impl Default for RotatingCriteria {
    fn default() -> Self {
        Self {
            level_range: LevelRange::default(),
            kinds: Vec::new(),
            categories: BTreeMap::new(),
            require_traits: BTreeSet::new(),
            exclude_traits: BTreeSet::new(),
            price_ceiling: None,
            name_overrides: Vec::new(),
            grade_filter: false,
            reference_level: None,
        }
    }
}

impl RotatingCriteria {
    /// Whether a category tag is present and enabled
    pub fn category_enabled(&self, category: &str) -> bool {
        self.categories.get(category).copied().unwrap_or(false)
    }
}

/// Criteria for one partition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Criteria {
    Fixed(FixedCriteria),
    Rotating(RotatingCriteria),
}

impl Criteria {
    /// Check the criteria for configuration errors
    pub fn validate(&self) -> Result<(), CriteriaError> {
        match self {
            Criteria::Fixed(fixed) => {
                if fixed.names.is_empty() && fixed.name_patterns.is_empty() {
                    return Err(CriteriaError::NoInclusionTriggers);
                }
                Ok(())
            }
            Criteria::Rotating(rot) => {
                if rot.level_range.min > rot.level_range.max {
                    return Err(CriteriaError::InvalidLevelRange {
                        min: rot.level_range.min,
                        max: rot.level_range.max,
                    });
                }
                if rot.kinds.is_empty() {
                    return Err(CriteriaError::NoKinds);
                }
                if let Some(conflict) = rot.require_traits.intersection(&rot.exclude_traits).next() {
                    return Err(CriteriaError::ConflictingTrait(conflict.clone()));
                }
                if rot.grade_filter && rot.reference_level.is_none() {
                    return Err(CriteriaError::MissingReferenceLevel);
                }
                Ok(())
            }
        }
    }

    /// Fill in the grade filter reference level when the criteria leave it unset
    pub fn with_default_reference_level(mut self, level: u32) -> Self {
        if let Criteria::Rotating(ref mut rot) = self {
            rot.reference_level.get_or_insert(level);
        }
        self
    }
}

impl From<FixedCriteria> for Criteria {
    fn from(c: FixedCriteria) -> Self {
        Criteria::Fixed(c)
    }
}

impl From<RotatingCriteria> for Criteria {
    fn from(c: RotatingCriteria) -> Self {
        Criteria::Rotating(c)
    }
}
