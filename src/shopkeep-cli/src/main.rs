mod cli;
mod commands;
mod config;
mod file_utils;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "shopkeep=debug,shopkeep_cli=debug"
    } else {
        "shopkeep=info,shopkeep_cli=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Generate {
            config,
            catalog,
            output,
            vendor,
        } => {
            commands::generate::handle(&config, catalog, output, vendor.as_deref())?;
        }

        Commands::Scrolls {
            rank,
            wand,
            tradition,
            rarity,
            spells,
            output,
        } => {
            commands::scrolls::handle(
                rank,
                wand,
                tradition.as_deref(),
                rarity.as_deref(),
                spells,
                output,
            )?;
        }

        Commands::Inspect { catalog, skipped } => {
            commands::inspect::handle(catalog, skipped)?;
        }

        Commands::Preview { table, rolls, seed } => {
            commands::preview::handle(&table, rolls, seed)?;
        }

        Commands::Configure {
            catalog,
            spells,
            output,
            show,
        } => {
            commands::configure::handle(catalog, spells, output, show)?;
        }
    }

    Ok(())
}
