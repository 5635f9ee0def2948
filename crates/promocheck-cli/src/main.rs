mod catalog;
mod run;

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "promocheck-cli")]
#[command(about = "Check storefront promo badges against listed prices")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render catalog pages and reconcile their badges and prices
    Run {
        /// Catalog page URLs to check
        urls: Vec<String>,
        /// Expected product count, paired with the URLs in order
        #[arg(long = "expected", value_name = "N")]
        expected: Vec<usize>,
        /// YAML file with more test cases (`tests: [{url, expected_count}]`)
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
        /// Print the report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Catalog configuration commands
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
}

#[derive(Debug, Subcommand)]
enum CatalogCommands {
    /// Load and validate the catalog file
    Check {
        /// Catalog file to check; defaults to `PROMOCHECK_CATALOG_PATH`
        #[arg(long, value_name = "PATH")]
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = promocheck_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Run {
            urls,
            expected,
            file,
            json,
        }) => {
            let mut file_cases = Vec::new();
            if let Some(path) = file.as_deref() {
                file_cases = run::load_cases_file(path)?;
            }
            let cases = run::build_cases(&urls, &expected, file_cases)?;
            run::run_checks(&config, cases, json).await?;
        }
        Some(Commands::Catalog {
            command: CatalogCommands::Check { path },
        }) => {
            let path = path.unwrap_or_else(|| config.catalog_path.clone());
            catalog::run_catalog_check(&path)?;
        }
        None => Cli::command().print_help()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
