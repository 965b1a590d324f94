//! Vendor stock tables
//!
//! A shop configuration lists vendors, each with up to two partitions:
//! stock that is always available and stock that rotates between visits.
//! Always-available items are claimed first and removed from the rotating
//! partition so the two tables never offer the same item.

use crate::catalog::{rarity_breakdown, Catalog};
use crate::criteria::{Criteria, CriteriaError};
use crate::dedup::exclude_claimed;
use crate::filter::filter;
use crate::ids::IdSource;
use crate::item::{ItemRecord, Rarity};
use crate::table::{
    RollTable, TableBuilder, TableError, TableOptions, Weighting, EQUIPMENT_UUID_TEMPLATE,
    ID_PLACEHOLDER,
};
use crate::weight::WeightModel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Vendor '{vendor}', {partition} partition: {source}")]
    Criteria {
        vendor: String,
        partition: PartitionKind,
        #[source]
        source: CriteriaError,
    },

    #[error("Document UUID template '{0}' has no {{id}} placeholder")]
    InvalidUuidTemplate(String),

    #[error("Vendor '{0}' has no partitions")]
    EmptyVendor(String),

    #[error("No vendor named '{0}'")]
    UnknownVendor(String),
}

/// The two partitions a vendor can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionKind {
    Always,
    Rotating,
}

impl PartitionKind {
    /// Human-readable title used in table names
    pub fn title(&self) -> &'static str {
        match self {
            PartitionKind::Always => "Always Available",
            PartitionKind::Rotating => "Rotating Stock",
        }
    }

    /// File name suffix for exported tables
    pub fn file_stem(&self) -> &'static str {
        match self {
            PartitionKind::Always => "always-available",
            PartitionKind::Rotating => "rotating-stock",
        }
    }
}

impl std::fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartitionKind::Always => write!(f, "always-available"),
            PartitionKind::Rotating => write!(f, "rotating"),
        }
    }
}

/// One partition of a vendor's stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub img: String,
    #[serde(default)]
    pub weighting: Weighting,
    pub criteria: Criteria,
}

/// A vendor and its stock partitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// How many times to roll the rotating table per visit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_rolls: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub always: Option<Partition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotating: Option<Partition>,
}

impl VendorProfile {
    /// Partitions in claim order: always-available first
    pub fn partitions(&self) -> impl Iterator<Item = (PartitionKind, &Partition)> {
        [
            (PartitionKind::Always, self.always.as_ref()),
            (PartitionKind::Rotating, self.rotating.as_ref()),
        ]
        .into_iter()
        .filter_map(|(kind, p)| p.map(|p| (kind, p)))
    }

    /// File-name-safe vendor name
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }
}

fn default_document_uuid() -> String {
    EQUIPMENT_UUID_TEMPLATE.to_string()
}

/// Full shop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopConfig {
    /// Party level; used in table names and as the grade filter reference
    pub player_level: u32,
    #[serde(default)]
    pub weights: WeightModel,
    #[serde(default = "default_document_uuid")]
    pub document_uuid: String,
    #[serde(default)]
    pub vendors: Vec<VendorProfile>,
}

impl ShopConfig {
    /// Load from a TOML file, or YAML when the extension is `.yaml`/`.yml`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
            .unwrap_or(false);

        if is_yaml {
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn vendor(&self, name: &str) -> Result<&VendorProfile, ConfigError> {
        self.vendors
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name) || v.slug() == slugify(name))
            .ok_or_else(|| ConfigError::UnknownVendor(name.to_string()))
    }

    /// Criteria with shop-wide defaults applied
    fn resolve(&self, criteria: &Criteria) -> Criteria {
        criteria.clone().with_default_reference_level(self.player_level)
    }

    /// Check every vendor's criteria before any filtering happens
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.document_uuid.contains(ID_PLACEHOLDER) {
            return Err(ConfigError::InvalidUuidTemplate(self.document_uuid.clone()));
        }
        for vendor in &self.vendors {
            if vendor.always.is_none() && vendor.rotating.is_none() {
                return Err(ConfigError::EmptyVendor(vendor.name.clone()));
            }
            for (kind, partition) in vendor.partitions() {
                self.resolve(&partition.criteria)
                    .validate()
                    .map_err(|source| ConfigError::Criteria {
                        vendor: vendor.name.clone(),
                        partition: kind,
                        source,
                    })?;
            }
        }
        Ok(())
    }
}

/// Result of building one partition's table
#[derive(Debug, Clone)]
pub struct PartitionOutcome {
    pub kind: PartitionKind,
    /// Items that passed filtering (and dedup, for rotating stock)
    pub item_count: usize,
    pub rarities: BTreeMap<Rarity, usize>,
    /// `Err(NoEligibleItems)` when nothing survived
    pub table: Result<RollTable, TableError>,
}

/// All tables generated for one vendor
#[derive(Debug, Clone)]
pub struct VendorTables {
    pub vendor: String,
    pub slug: String,
    pub stock_rolls: Option<usize>,
    pub partitions: Vec<PartitionOutcome>,
}

impl VendorTables {
    pub fn partition(&self, kind: PartitionKind) -> Option<&PartitionOutcome> {
        self.partitions.iter().find(|p| p.kind == kind)
    }

    /// Output file name for a partition's table
    pub fn file_name(&self, kind: PartitionKind) -> String {
        format!("{}-{}.json", self.slug, kind.file_stem())
    }
}

/// Generates vendor tables from a validated shop configuration
pub struct VendorGenerator<'a> {
    config: &'a ShopConfig,
    builder: TableBuilder,
}

impl<'a> VendorGenerator<'a> {
    /// Validates the configuration up front
    pub fn new(config: &'a ShopConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            builder: TableBuilder::new(config.weights),
        })
    }

    /// Tables for every configured vendor
    pub fn generate_all<I: IdSource + ?Sized>(
        &self,
        catalog: &Catalog,
        ids: &mut I,
    ) -> Vec<VendorTables> {
        self.config
            .vendors
            .iter()
            .map(|vendor| self.generate_vendor(catalog, vendor, ids))
            .collect()
    }

    /// Tables for one vendor
    pub fn generate_vendor<I: IdSource + ?Sized>(
        &self,
        catalog: &Catalog,
        vendor: &VendorProfile,
        ids: &mut I,
    ) -> VendorTables {
        let mut claimed: Vec<&ItemRecord> = Vec::new();
        let mut partitions = Vec::new();

        for (kind, partition) in vendor.partitions() {
            let criteria = self.config.resolve(&partition.criteria);
            let mut items = filter(catalog, &criteria);
            if kind == PartitionKind::Rotating {
                items = exclude_claimed(&claimed, items);
            }

            tracing::info!(
                "{} / {}: {} matching items",
                vendor.name,
                kind.title(),
                items.len()
            );

            let options = TableOptions::new(format!(
                "{} - {} (Level {})",
                vendor.name,
                kind.title(),
                self.config.player_level
            ))
            .description(if partition.description.is_empty() {
                vendor.description.clone()
            } else {
                partition.description.clone()
            })
            .img(partition.img.clone())
            .weighting(partition.weighting)
            .document_uuid(self.config.document_uuid.clone());

            let table = self.builder.build(&items, &options, ids);
            if let Err(e) = &table {
                tracing::warn!("{}", e);
            }

            partitions.push(PartitionOutcome {
                kind,
                item_count: items.len(),
                rarities: rarity_breakdown(items.iter().copied()),
                table,
            });

            if kind == PartitionKind::Always {
                claimed = items;
            }
        }

        VendorTables {
            vendor: vendor.name.clone(),
            slug: vendor.slug(),
            stock_rolls: vendor.stock_rolls,
            partitions,
        }
    }
}

/// Lowercase, ASCII alphanumerics separated by single dashes
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
