mod venues;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::venues::VenuesCommands;

#[derive(Debug, Parser)]
#[command(name = "venuemap-cli")]
#[command(about = "Venue map command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Search, geocode, and import venues
    Venues {
        #[command(subcommand)]
        command: VenuesCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("venuemap-cli: run with --help to list commands");
        return Ok(());
    };

    let config = venuemap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = venuemap_db::PoolConfig::from_app_config(&config);
    let pool = venuemap_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db {
            command: DbCommands::Ping,
        } => {
            venuemap_db::ping(&pool).await?;
            println!("database ok");
        }
        Commands::Db {
            command: DbCommands::Migrate,
        } => {
            let applied = venuemap_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Venues { command } => venues::run(&pool, &config, command).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
