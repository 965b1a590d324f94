//! Rarity weights
//!
//! A weight is the number of consecutive roll values an entry occupies.
//! Zero is a valid setting and keeps the rarity out of weighted tables.

use crate::item::Rarity;
use serde::{Deserialize, Serialize};

/// Rarity → selection weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightModel {
    pub common: u32,
    pub uncommon: u32,
    pub rare: u32,
    pub unique: u32,
}

impl Default for WeightModel {
    fn default() -> Self {
        Self {
            common: 4,
            uncommon: 2,
            rare: 1,
            unique: 0,
        }
    }
}

impl WeightModel {
    /// Configured weight for a rarity
    pub fn weight(&self, rarity: Rarity) -> u32 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::Unique => self.unique,
        }
    }

    /// Weight for a raw rarity tag, falling back to `common` for unknown tags
    pub fn weight_for_tag(&self, tag: &str) -> u32 {
        match Rarity::from_tag(tag) {
            Some(rarity) => self.weight(rarity),
            None => {
                tracing::debug!("Unknown rarity tag '{}', using common weight", tag);
                self.common
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let model = WeightModel::default();
        assert_eq!(model.weight(Rarity::Common), 4);
        assert_eq!(model.weight(Rarity::Uncommon), 2);
        assert_eq!(model.weight(Rarity::Rare), 1);
        assert_eq!(model.weight(Rarity::Unique), 0);
    }

    #[test]
    fn test_unknown_tag_falls_back_to_common() {
        let model = WeightModel {
            common: 7,
            ..WeightModel::default()
        };
        assert_eq!(model.weight_for_tag("mythic"), 7);
        assert_eq!(model.weight_for_tag(""), 7);
        assert_eq!(model.weight_for_tag("rare"), 1);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let model: WeightModel = toml::from_str("rare = 3").unwrap();
        assert_eq!(model.rare, 3);
        assert_eq!(model.common, 4);
        assert_eq!(model.unique, 0);
    }
}
