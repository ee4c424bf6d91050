//! farmstand CLI - farm and product marketplace
//!
//! - `serve`: run the JSON API (PostgreSQL or in-memory store)
//! - `seed`: load the demo farms and products
//! - `stats`: print counts and every farm with its products

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use commands::{SeedArgs, ServeArgs, StatsArgs};
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "farmstand",
    author,
    version,
    about = "Farm and product marketplace API",
    long_about = "Serve a JSON API for farms and the products they sell. Products can be \
                  attached to a farm or stand alone; deleting a farm removes its products."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG still wins when set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(ServeArgs),

    /// Load the demo dataset into the database
    Seed(SeedArgs),

    /// Print marketplace statistics
    Stats(StatsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so clap's env fallbacks can see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })
    .ok();

    let result = match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await,
        Commands::Seed(args) => commands::run_seed(args).await,
        Commands::Stats(args) => commands::run_stats(args).await,
    };

    tracing_setup::shutdown_otel();
    result
}
