//! Demo data loader

use anyhow::{Context, Result};
use clap::Parser;

use farmstand_server::seed::{self, SeedOptions};

/// Arguments for the seed command
#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Remove previously seeded farms and products first
    #[arg(long)]
    pub clear: bool,

    /// Also insert standalone products (no owning farm)
    #[arg(long)]
    pub standalone: bool,
}

pub async fn run_seed(args: SeedArgs) -> Result<()> {
    let market = super::connect(args.database_url, 1).await?;

    let options = SeedOptions {
        clear: args.clear,
        standalone: args.standalone,
    };
    let report = seed::run(&market, options)
        .await
        .context("Seeding failed")?;
    market.close().await;

    if args.clear {
        println!(
            "Cleared {} farms and {} products",
            report.farms_removed, report.products_removed
        );
    }
    println!(
        "Created {} farms with {} products",
        report.farms_created, report.products_created
    );
    if args.standalone {
        println!("Created {} standalone products", report.standalone_created);
    }

    Ok(())
}
