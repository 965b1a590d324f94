//! Core CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shopkeep")]
#[command(about = "PF2e vendor roll table generator for Foundry VTT", long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate vendor roll tables from a shop configuration
    #[command(visible_alias = "g")]
    Generate {
        /// Shop configuration (.toml, .yaml or .yml)
        #[arg(default_value = "share/vendors/level-7.toml")]
        config: PathBuf,

        /// Equipment pack directory (uses configured default if not provided)
        #[arg(short, long, env = "SHOPKEEP_CATALOG")]
        catalog: Option<PathBuf>,

        /// Output directory (uses configured default if not provided)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only generate tables for this vendor
        #[arg(long)]
        vendor: Option<String>,
    },

    /// Generate a scroll or wand table for one spell rank
    #[command(visible_alias = "sc")]
    Scrolls {
        /// Spell rank (1-10, wands 1-9)
        rank: u32,

        /// Build a wand table instead of a scroll table
        #[arg(long)]
        wand: bool,

        /// Only spells of this tradition (arcane, divine, occult, primal)
        #[arg(short, long)]
        tradition: Option<String>,

        /// Only spells of this rarity (common, uncommon, rare, unique)
        #[arg(short, long)]
        rarity: Option<String>,

        /// Spell pack directory (uses configured default if not provided)
        #[arg(short, long, env = "SHOPKEEP_SPELLS")]
        spells: Option<PathBuf>,

        /// Output file (defaults to <output dir>/<form>-rank-<n>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize an equipment pack directory
    #[command(visible_alias = "i")]
    Inspect {
        /// Equipment pack directory (uses configured default if not provided)
        catalog: Option<PathBuf>,

        /// List files that could not be parsed
        #[arg(long)]
        skipped: bool,
    },

    /// Roll a generated table to preview a restock
    #[command(visible_alias = "p")]
    Preview {
        /// Roll table JSON file
        table: PathBuf,

        /// Number of rolls
        #[arg(short = 'n', long, default_value_t = 10)]
        rolls: usize,

        /// Seed for reproducible rolls
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set default equipment pack directory
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Set default spell pack directory
        #[arg(long)]
        spells: Option<PathBuf>,

        /// Set default output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
