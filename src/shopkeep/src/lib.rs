//! # shopkeep
//!
//! Weighted vendor roll tables for Pathfinder 2e catalogs in Foundry VTT.
//!
//! This library provides functionality to:
//! - Load PF2e item and spell documents from a compendium pack directory
//! - Filter items with fixed inclusion lists or rotating category rules
//! - Keep always-available and rotating stock disjoint
//! - Build `RollTable` documents weighted by rarity
//! - Build scroll and wand tables for a spell rank
//!
//! ## Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = shopkeep::ShopConfig::load("share/vendors/level-7.toml")?;
//! let (catalog, _report) = shopkeep::Catalog::load_dir("pf2e/packs/equipment")?;
//!
//! let generator = shopkeep::VendorGenerator::new(&config)?;
//! for vendor in generator.generate_all(&catalog, &mut shopkeep::RandomIds) {
//!     for partition in &vendor.partitions {
//!         if let Ok(table) = &partition.table {
//!             println!("{}: {}", table.name, table.formula);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod criteria;
pub mod dedup;
pub mod filter;
pub mod ids;
pub mod item;
pub mod scroll;
pub mod table;
pub mod vendor;
pub mod weight;

#[doc(inline)]
pub use catalog::{load_documents, rarity_breakdown, Catalog, CatalogError, LoadReport};
#[doc(inline)]
pub use criteria::{Criteria, CriteriaError, FixedCriteria, LevelRange, RotatingCriteria};
#[doc(inline)]
pub use dedup::exclude_claimed;
#[doc(inline)]
pub use filter::{filter, matches};
#[doc(inline)]
pub use ids::{IdSource, RandomIds, SequentialIds};
#[doc(inline)]
pub use item::{Grade, ItemKind, ItemRecord, Price, Rarity};
#[doc(inline)]
pub use scroll::{
    build_scroll_table, load_spells, ScrollError, ScrollQuery, SpellForm, SpellRecord, Tradition,
};
#[doc(inline)]
pub use table::{RollTable, TableBuilder, TableError, TableOptions, TableResult, Weighting};
#[doc(inline)]
pub use vendor::{
    ConfigError, PartitionKind, PartitionOutcome, ShopConfig, VendorGenerator, VendorProfile,
    VendorTables,
};
#[doc(inline)]
pub use weight::WeightModel;
