pub mod client;
pub mod config;
pub mod export;
pub mod pipeline;
pub mod traverse;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use config::Config;
use pipeline::run_export;

#[derive(Parser)]
#[clap(
    name = "sienge-export",
    version,
    about = "Flatten Sienge building-project measurement records into a CSV file"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch all measurement item records and write the flattened CSV
    Export {
        /// Destination CSV file
        #[clap(long, default_value = "measurements.csv")]
        output: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Export { output } => {
            let config = Config::from_env()?;
            println!("Export starting...");
            match run_export(&config, &output).await {
                Ok(report) => {
                    println!("Export complete.\nReport:");
                    println!("{:#?}", report);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Export failed: {e}");
                    Err(anyhow::Error::new(e))
                }
            }
        }
    }
}
