//! Weighted roll tables
//!
//! [`TableBuilder`] turns a filtered set of entries into a Foundry VTT
//! `RollTable` document. Entries are ordered by (level, name) and given
//! contiguous ranges starting at 1, so the same input always produces the
//! same ranges and the table formula is `1d<N>` with `N` the total weight.

use crate::ids::IdSource;
use crate::item::{ItemRecord, Rarity};
use crate::weight::WeightModel;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

/// Placeholder replaced by the source id in document UUID templates
pub const ID_PLACEHOLDER: &str = "{id}";

/// Default UUID template for PF2e equipment
pub const EQUIPMENT_UUID_TEMPLATE: &str = "Compendium.pf2e.equipment-srd.Item.{id}";

/// Ownership level for players: none
pub const OWNERSHIP_NONE: u8 = 0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("No eligible items for table '{table}'")]
    NoEligibleItems { table: String },

    #[error("Document UUID template '{0}' has no {{id}} placeholder")]
    InvalidUuidTemplate(String),

    #[error("Total weight of table '{table}' does not fit in a u32 die")]
    WeightOverflow { table: String },
}

/// Anything that can become a table entry
pub trait TableSource {
    /// Stable id used to build the document reference
    fn source_id(&self) -> &str;
    /// Entry name as shown in the table
    fn display_name(&self) -> String;
    fn level(&self) -> u32;
    fn rarity(&self) -> Rarity;
    fn img(&self) -> &str;
}

impl TableSource for ItemRecord {
    fn source_id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn rarity(&self) -> Rarity {
        self.rarity
    }

    fn img(&self) -> &str {
        &self.img
    }
}

/// How entry weights are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// Weight from the rarity model
    #[default]
    Rarity,
    /// Every entry has weight 1
    Uniform,
}

/// Table metadata
#[derive(Debug, Clone)]
pub struct TableOptions {
    pub name: String,
    pub description: String,
    pub img: String,
    pub weighting: Weighting,
    /// Template for `documentUuid`; `{id}` is replaced by the source id
    pub document_uuid: String,
}

impl TableOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            img: String::new(),
            weighting: Weighting::Rarity,
            document_uuid: EQUIPMENT_UUID_TEMPLATE.to_string(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn img(mut self, img: impl Into<String>) -> Self {
        self.img = img.into();
        self
    }

    pub fn weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }

    pub fn document_uuid(mut self, template: impl Into<String>) -> Self {
        self.document_uuid = template.into();
        self
    }
}

/// Player visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ownership {
    pub default: u8,
}

/// One entry of a roll table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResult {
    #[serde(rename = "_id")]
    pub id: String,
    pub description: String,
    pub document_uuid: String,
    pub drawn: bool,
    pub img: String,
    pub name: String,
    /// Inclusive roll range
    pub range: [u32; 2],
    #[serde(rename = "type")]
    pub result_type: String,
    pub weight: u32,
}

impl TableResult {
    pub fn contains(&self, roll: u32) -> bool {
        (self.range[0]..=self.range[1]).contains(&roll)
    }
}

/// Foundry VTT roll table document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollTable {
    #[serde(rename = "_id")]
    pub id: String,
    pub description: String,
    pub display_roll: bool,
    pub formula: String,
    pub img: String,
    pub name: String,
    pub ownership: Ownership,
    pub replacement: bool,
    pub results: Vec<TableResult>,
}

impl RollTable {
    /// Sum of all entry weights (the die size)
    pub fn total_weight(&self) -> u32 {
        self.results.last().map(|r| r.range[1]).unwrap_or(0)
    }

    /// Whether ranges run from 1 without gaps or overlaps and match weights.
    ///
    /// Tables built here always are; hand-edited files may not be.
    pub fn is_contiguous(&self) -> bool {
        let mut expected: u64 = 1;
        for r in &self.results {
            let [lo, hi] = r.range;
            if u64::from(lo) != expected || hi < lo || hi - lo + 1 != r.weight {
                return false;
            }
            expected = u64::from(hi) + 1;
        }
        true
    }

    /// Entry whose range contains `roll`
    pub fn lookup(&self, roll: u32) -> Option<&TableResult> {
        let idx = self
            .results
            .binary_search_by(|r| {
                if r.contains(roll) {
                    Ordering::Equal
                } else if roll < r.range[0] {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            })
            .ok()?;
        self.results.get(idx)
    }

    /// Roll the table `count` times with replacement
    pub fn draw<R: Rng>(&self, rng: &mut R, count: usize) -> Vec<&TableResult> {
        let total = self.total_weight();
        if total == 0 {
            return Vec::new();
        }
        (0..count)
            .filter_map(|_| self.lookup(rng.gen_range(1..=total)))
            .collect()
    }
}

/// Builds roll tables with a fixed weight model
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    weights: WeightModel,
}

impl TableBuilder {
    pub fn new(weights: WeightModel) -> Self {
        Self { weights }
    }

    fn weight_of<T: TableSource + ?Sized>(&self, entry: &T, weighting: Weighting) -> u32 {
        match weighting {
            Weighting::Rarity => self.weights.weight(entry.rarity()),
            Weighting::Uniform => 1,
        }
    }

    /// Build a table from filtered entries.
    ///
    /// Entries with weight 0 are dropped. An empty result is an error rather
    /// than a zero-sided table.
    pub fn build<T, I>(
        &self,
        entries: &[&T],
        options: &TableOptions,
        ids: &mut I,
    ) -> Result<RollTable, TableError>
    where
        T: TableSource + ?Sized,
        I: IdSource + ?Sized,
    {
        if !options.document_uuid.contains(ID_PLACEHOLDER) {
            return Err(TableError::InvalidUuidTemplate(options.document_uuid.clone()));
        }

        let mut sorted: Vec<(&T, String)> = entries
            .iter()
            .map(|entry| (*entry, entry.display_name()))
            .collect();
        sorted.sort_by(|(a, a_name), (b, b_name)| {
            a.level()
                .cmp(&b.level())
                .then_with(|| a_name.cmp(b_name))
                .then_with(|| a.source_id().cmp(b.source_id()))
        });

        let overflow = || TableError::WeightOverflow {
            table: options.name.clone(),
        };

        let mut results = Vec::with_capacity(sorted.len());
        let mut cursor: u64 = 1;

        for (entry, name) in sorted {
            let weight = self.weight_of(entry, options.weighting);
            if weight == 0 {
                continue;
            }

            let lo = u32::try_from(cursor).map_err(|_| overflow())?;
            let hi = u32::try_from(cursor + u64::from(weight) - 1).map_err(|_| overflow())?;

            results.push(TableResult {
                id: ids.next_id(),
                description: String::new(),
                document_uuid: options
                    .document_uuid
                    .replace(ID_PLACEHOLDER, entry.source_id()),
                drawn: false,
                img: entry.img().to_string(),
                name,
                range: [lo, hi],
                result_type: "document".to_string(),
                weight,
            });

            cursor += u64::from(weight);
        }

        let total = u32::try_from(cursor - 1).map_err(|_| overflow())?;
        if total == 0 {
            return Err(TableError::NoEligibleItems {
                table: options.name.clone(),
            });
        }

        tracing::debug!(
            "Built table '{}': {} entries, formula 1d{}",
            options.name,
            results.len(),
            total
        );

        Ok(RollTable {
            id: ids.next_id(),
            description: options.description.clone(),
            display_roll: true,
            formula: format!("1d{}", total),
            img: options.img.clone(),
            name: options.name.clone(),
            ownership: Ownership {
                default: OWNERSHIP_NONE,
            },
            replacement: true,
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::item::ItemKind;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn item(id: &str, name: &str, level: u32, rarity: Rarity) -> ItemRecord {
        ItemRecord::new(id, name, ItemKind::Equipment)
            .with_level(level)
            .with_rarity(rarity)
    }

    fn build(items: &[ItemRecord], weighting: Weighting) -> Result<RollTable, TableError> {
        let refs: Vec<&ItemRecord> = items.iter().collect();
        let options = TableOptions::new("Test Table").weighting(weighting);
        TableBuilder::default().build(&refs, &options, &mut SequentialIds::default())
    }

    fn assert_contiguous(table: &RollTable) {
        let mut expected_lo = 1;
        let mut sum = 0;
        for r in &table.results {
            assert!(r.weight > 0);
            assert_eq!(r.range[0], expected_lo);
            assert_eq!(r.range[1] - r.range[0] + 1, r.weight);
            expected_lo = r.range[1] + 1;
            sum += r.weight;
        }
        assert_eq!(table.total_weight(), sum);
        assert_eq!(table.formula, format!("1d{}", sum));
    }

    #[test]
    fn test_weight_allocation() {
        let items = vec![
            item("c", "Crossbow", 1, Rarity::Common),
            item("u", "Cloak", 2, Rarity::Uncommon),
            item("r", "Crown", 3, Rarity::Rare),
        ];
        let table = build(&items, Weighting::Rarity).unwrap();

        let ranges: Vec<[u32; 2]> = table.results.iter().map(|r| r.range).collect();
        assert_eq!(ranges, vec![[1, 4], [5, 6], [7, 7]]);
        assert_eq!(table.formula, "1d7");
        assert_contiguous(&table);
    }

    #[test]
    fn test_zero_weight_entries_are_dropped() {
        let items = vec![
            item("a", "Amulet", 1, Rarity::Common),
            item("u", "Artifact", 1, Rarity::Unique),
            item("b", "Bracers", 1, Rarity::Rare),
        ];
        let table = build(&items, Weighting::Rarity).unwrap();

        assert_eq!(table.results.len(), 2);
        assert!(table.results.iter().all(|r| r.name != "Artifact"));
        assert_eq!(table.formula, "1d5");
        assert_contiguous(&table);
    }

    #[test]
    fn test_uniform_weighting() {
        let items = vec![
            item("a", "Rope", 0, Rarity::Common),
            item("b", "Torch", 0, Rarity::Rare),
            item("c", "Chalk", 0, Rarity::Unique),
        ];
        let table = build(&items, Weighting::Uniform).unwrap();
        assert_eq!(table.formula, "1d3");
        assert!(table.results.iter().all(|r| r.weight == 1));
        assert_contiguous(&table);
    }

    #[test]
    fn test_sort_by_level_then_name() {
        let items = vec![
            item("3", "Zither", 1, Rarity::Common),
            item("1", "Spear", 2, Rarity::Common),
            item("2", "Abacus", 1, Rarity::Common),
        ];
        let table = build(&items, Weighting::Rarity).unwrap();
        let names: Vec<&str> = table.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Abacus", "Zither", "Spear"]);
    }

    #[test]
    fn test_sort_independent_of_input_order() {
        let items = vec![
            item("a", "Dagger", 1, Rarity::Common),
            item("b", "Buckler", 0, Rarity::Uncommon),
            item("c", "Crossbow", 1, Rarity::Rare),
            item("d", "Arrows", 0, Rarity::Common),
        ];
        let mut reversed = items.clone();
        reversed.reverse();

        let first = build(&items, Weighting::Rarity).unwrap();
        let second = build(&reversed, Weighting::Rarity).unwrap();

        // Same id source state, so the whole document must be identical
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = build(&[], Weighting::Rarity).unwrap_err();
        assert_eq!(
            err,
            TableError::NoEligibleItems {
                table: "Test Table".to_string()
            }
        );
    }

    #[test]
    fn test_all_zero_weight_is_an_error() {
        let items = vec![item("u", "Artifact", 1, Rarity::Unique)];
        assert!(matches!(
            build(&items, Weighting::Rarity),
            Err(TableError::NoEligibleItems { .. })
        ));
    }

    #[test]
    fn test_document_uuid_interpolation() {
        let items = vec![item("abc123", "Rope", 0, Rarity::Common)];
        let table = build(&items, Weighting::Rarity).unwrap();
        assert_eq!(
            table.results[0].document_uuid,
            "Compendium.pf2e.equipment-srd.Item.abc123"
        );
    }

    #[test]
    fn test_invalid_uuid_template() {
        let items = [item("a", "Rope", 0, Rarity::Common)];
        let refs: Vec<&ItemRecord> = items.iter().collect();
        let options = TableOptions::new("T").document_uuid("Compendium.pf2e.equipment-srd");
        let err = TableBuilder::default()
            .build(&refs, &options, &mut SequentialIds::default())
            .unwrap_err();
        assert!(matches!(err, TableError::InvalidUuidTemplate(_)));
    }

    #[test]
    fn test_total_weight_overflow_is_an_error() {
        let weights = WeightModel {
            common: u32::MAX / 2 + 1,
            ..WeightModel::default()
        };
        let items = [
            item("a", "Rope", 0, Rarity::Common),
            item("b", "Torch", 0, Rarity::Common),
        ];
        let refs: Vec<&ItemRecord> = items.iter().collect();
        let err = TableBuilder::new(weights)
            .build(&refs, &TableOptions::new("Huge"), &mut SequentialIds::default())
            .unwrap_err();
        assert_eq!(
            err,
            TableError::WeightOverflow {
                table: "Huge".to_string()
            }
        );
    }

    #[test]
    fn test_total_weight_at_u32_max() {
        let weights = WeightModel {
            common: u32::MAX,
            ..WeightModel::default()
        };
        let items = [item("a", "Rope", 0, Rarity::Common)];
        let refs: Vec<&ItemRecord> = items.iter().collect();
        let table = TableBuilder::new(weights)
            .build(&refs, &TableOptions::new("Max"), &mut SequentialIds::default())
            .unwrap();
        assert_eq!(table.results[0].range, [1, u32::MAX]);
        assert_eq!(table.total_weight(), u32::MAX);
        assert!(table.is_contiguous());
    }

    #[test]
    fn test_is_contiguous_rejects_gaps() {
        let items = vec![
            item("c", "Crossbow", 1, Rarity::Common),
            item("u", "Cloak", 2, Rarity::Uncommon),
        ];
        let mut table = build(&items, Weighting::Rarity).unwrap();
        assert!(table.is_contiguous());

        // [1,4] then [7,8]: rolls 5 and 6 land nowhere
        table.results[1].range = [7, 8];
        assert!(!table.is_contiguous());

        // Range no longer matches the declared weight
        table.results[1].range = [5, 7];
        assert!(!table.is_contiguous());
    }

    #[test]
    fn test_serialized_shape() {
        let items = vec![item("abc", "Rope", 0, Rarity::Common)];
        let table = build(&items, Weighting::Rarity).unwrap();
        let json = serde_json::to_value(&table).unwrap();

        assert_eq!(json["displayRoll"], true);
        assert_eq!(json["replacement"], true);
        assert_eq!(json["formula"], "1d4");
        assert_eq!(json["ownership"]["default"], 0);
        assert!(json["_id"].is_string());

        let result = &json["results"][0];
        assert_eq!(result["type"], "document");
        assert_eq!(result["drawn"], false);
        assert_eq!(result["description"], "");
        assert_eq!(result["range"], serde_json::json!([1, 4]));
        assert_eq!(result["weight"], 4);
        assert_eq!(
            result["documentUuid"],
            "Compendium.pf2e.equipment-srd.Item.abc"
        );
    }

    #[test]
    fn test_lookup() {
        let items = vec![
            item("c", "Crossbow", 1, Rarity::Common),
            item("u", "Cloak", 2, Rarity::Uncommon),
            item("r", "Crown", 3, Rarity::Rare),
        ];
        let table = build(&items, Weighting::Rarity).unwrap();
        assert_eq!(table.lookup(1).map(|r| r.name.as_str()), Some("Crossbow"));
        assert_eq!(table.lookup(4).map(|r| r.name.as_str()), Some("Crossbow"));
        assert_eq!(table.lookup(5).map(|r| r.name.as_str()), Some("Cloak"));
        assert_eq!(table.lookup(7).map(|r| r.name.as_str()), Some("Crown"));
        assert!(table.lookup(0).is_none());
        assert!(table.lookup(8).is_none());
    }

    #[test]
    fn test_draw_stays_in_table() {
        let items = vec![
            item("c", "Crossbow", 1, Rarity::Common),
            item("r", "Crown", 3, Rarity::Rare),
        ];
        let table = build(&items, Weighting::Rarity).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let drawn = table.draw(&mut rng, 50);
        assert_eq!(drawn.len(), 50);
        assert!(drawn.iter().all(|r| r.name == "Crossbow" || r.name == "Crown"));
    }
}
