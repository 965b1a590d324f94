//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up shopkeep CLI defaults.

use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;

/// Handle the configure command
///
/// # Arguments
/// * `catalog` - Default equipment pack directory
/// * `spells` - Default spell pack directory
/// * `output` - Default output directory
/// * `show` - If true, show current configuration
pub fn handle(
    catalog: Option<PathBuf>,
    spells: Option<PathBuf>,
    output: Option<PathBuf>,
    show: bool,
) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if apply(&mut config, catalog, spells, output) {
        config.save()?;
        show_config(&config);
    } else {
        show_usage();
    }

    Ok(())
}

/// Set the given defaults; returns whether anything changed
fn apply(
    config: &mut Config,
    catalog: Option<PathBuf>,
    spells: Option<PathBuf>,
    output: Option<PathBuf>,
) -> bool {
    let mut changed = false;
    for (slot, value) in [
        (&mut config.catalog_dir, catalog),
        (&mut config.spells_dir, spells),
        (&mut config.output_dir, output),
    ] {
        if let Some(value) = value {
            *slot = Some(value);
            changed = true;
        }
    }
    changed
}

/// Display current configuration
fn show_config(config: &Config) {
    let show = |label: &str, value: &Option<PathBuf>| match value {
        Some(path) => println!("{}: {}", label, path.display()),
        None => println!("{}: (not set)", label),
    };
    show("Equipment pack", &config.catalog_dir);
    show("Spell pack", &config.spells_dir);
    show("Output directory", &config.output_dir);

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: shopkeep configure --catalog ../pf2e/packs/equipment");
    println!("   or: shopkeep configure --spells ../pf2e/packs/spells");
    println!("   or: shopkeep configure --output vendor-tables");
    println!("   or: shopkeep configure --show");
}
