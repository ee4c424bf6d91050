//! Marketplace statistics report

use anyhow::{Context, Result};
use clap::Parser;

use farmstand_server::models::{format_usd, Pagination};
use farmstand_server::Marketplace;

/// Arguments for the stats command
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Print the counts as JSON instead of a report
    #[arg(long)]
    pub json: bool,
}

pub async fn run_stats(args: StatsArgs) -> Result<()> {
    let market = super::connect(args.database_url, 1).await?;
    let outcome = report(&market, args.json).await;
    market.close().await;
    outcome
}

async fn report(market: &Marketplace, json: bool) -> Result<()> {
    let stats = market.stats().await.context("Failed to collect statistics")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Marketplace statistics");
    println!("{}", "=".repeat(50));
    println!("Farms:    {}", stats.farm_count);
    println!("Products: {}", stats.product_count);

    println!("\nProducts by category:");
    for (category, count) in &stats.products_by_category {
        println!("  {:<10} {}", category.as_str(), count);
    }

    println!("\nFarms by type:");
    for (kind, count) in &stats.farms_by_type {
        println!("  {:<10} {}", kind, count);
    }

    let mut page = Pagination::everything();
    loop {
        let farms = market.farms(page).await?;

        for farm in &farms.items {
            let detail = market.farm_detail(farm.id).await?;
            println!("\n{} ({}, {})", farm.name, farm.kind, farm.location);
            for product in &detail.products {
                println!(
                    "  - {} {} [{}]",
                    product.name,
                    format_usd(product.price),
                    product.category
                );
            }
        }

        if !farms.has_next() {
            break;
        }
        page.page += 1;
    }

    Ok(())
}
