//! Vendor table generation
//!
//! Handles the `generate` subcommand: load a shop configuration and an
//! equipment pack, build every vendor's tables and write them as JSON.

use super::format_rarities;
use crate::config::Config;
use crate::file_utils::write_table;
use anyhow::{bail, Context, Result};
use shopkeep::{
    Catalog, IdSource, RandomIds, ShopConfig, TableError, VendorGenerator, VendorTables,
};
use std::path::{Path, PathBuf};

/// Handle the generate command
pub fn handle(
    config_path: &Path,
    catalog: Option<PathBuf>,
    output: Option<PathBuf>,
    vendor: Option<&str>,
) -> Result<()> {
    let defaults = Config::load()?;
    let catalog_dir = defaults.resolve_catalog(catalog)?;
    let output_dir = defaults.resolve_output(output);

    let shop = ShopConfig::load(config_path)
        .with_context(|| format!("Failed to load shop config {}", config_path.display()))?;

    let (catalog, report) = Catalog::load_dir(&catalog_dir)
        .with_context(|| format!("Failed to load catalog {}", catalog_dir.display()))?;
    println!(
        "Loaded {} items from {} ({} skipped)",
        report.loaded,
        catalog_dir.display(),
        report.skipped.len()
    );

    let written = generate(&shop, &catalog, vendor, &output_dir, &mut RandomIds)?;
    println!("\nWrote {} tables to {}", written.len(), output_dir.display());

    Ok(())
}

/// Build and write tables; returns the paths written
pub fn generate<I: IdSource + ?Sized>(
    shop: &ShopConfig,
    catalog: &Catalog,
    vendor: Option<&str>,
    output_dir: &Path,
    ids: &mut I,
) -> Result<Vec<PathBuf>> {
    let generator = VendorGenerator::new(shop).context("Invalid shop config")?;

    let vendors = match vendor {
        Some(name) => vec![generator.generate_vendor(catalog, shop.vendor(name)?, ids)],
        None => generator.generate_all(catalog, ids),
    };

    let mut written = Vec::new();
    for tables in &vendors {
        written.extend(write_vendor(tables, output_dir)?);
    }

    if written.is_empty() {
        bail!("No tables generated: every partition was empty");
    }

    Ok(written)
}

fn write_vendor(tables: &VendorTables, output_dir: &Path) -> Result<Vec<PathBuf>> {
    println!("\n=== {} ===", tables.vendor);

    let mut written = Vec::new();
    for partition in &tables.partitions {
        println!("\n{}: {} items", partition.kind.title(), partition.item_count);

        match &partition.table {
            Ok(table) => {
                let path = output_dir.join(tables.file_name(partition.kind));
                write_table(&path, table)?;

                println!("  Saved: {}", path.display());
                println!("  Formula: {}", table.formula);
                println!("  Rarity breakdown: {}", format_rarities(&partition.rarities));
                if partition.kind == shopkeep::PartitionKind::Rotating {
                    if let Some(rolls) = tables.stock_rolls {
                        println!("  Roll {} times to stock the shop", rolls);
                    }
                }
                written.push(path);
            }
            Err(TableError::NoEligibleItems { .. }) => {
                println!("  No eligible items, table not written");
            }
            Err(e) => return Err(e.clone()).context("Failed to build table"),
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopkeep::{ItemKind, ItemRecord, SequentialIds};

    const SHOP: &str = r#"
player_level = 3

[[vendors]]
name = "Corner Store"
stock_rolls = 5

[vendors.always]
weighting = "uniform"
[vendors.always.criteria]
mode = "fixed"
level_max = 1
names = ["Rope"]

[vendors.rotating]
[vendors.rotating.criteria]
mode = "rotating"
level_range = { min = 0, max = 5 }
kinds = ["equipment"]
"#;

    fn catalog() -> Catalog {
        Catalog::from_items(vec![
            ItemRecord::new("r", "Rope", ItemKind::Equipment),
            ItemRecord::new("t", "Torch", ItemKind::Equipment),
        ])
    }

    #[test]
    fn test_generate_writes_both_tables() {
        let temp_dir = tempfile::tempdir().unwrap();
        let shop = ShopConfig::from_toml_str(SHOP).unwrap();

        let written = generate(
            &shop,
            &catalog(),
            None,
            temp_dir.path(),
            &mut SequentialIds::default(),
        )
        .unwrap();

        assert_eq!(written.len(), 2);
        assert!(temp_dir
            .path()
            .join("corner-store-always-available.json")
            .exists());
        let rotating =
            crate::file_utils::read_table(&temp_dir.path().join("corner-store-rotating-stock.json"))
                .unwrap();
        assert_eq!(rotating.results.len(), 1);
        assert_eq!(rotating.results[0].name, "Torch");
    }

    #[test]
    fn test_generate_unknown_vendor() {
        let temp_dir = tempfile::tempdir().unwrap();
        let shop = ShopConfig::from_toml_str(SHOP).unwrap();
        assert!(generate(
            &shop,
            &catalog(),
            Some("Blacksmith"),
            temp_dir.path(),
            &mut SequentialIds::default(),
        )
        .is_err());
    }

    #[test]
    fn test_generate_empty_catalog_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let shop = ShopConfig::from_toml_str(SHOP).unwrap();
        assert!(generate(
            &shop,
            &Catalog::default(),
            None,
            temp_dir.path(),
            &mut SequentialIds::default(),
        )
        .is_err());
    }
}
