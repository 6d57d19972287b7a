use anyhow::Result;
use clap::Parser;

use sienge_export::config::Config;
use sienge_export::pipeline::run_export;
use sienge_export::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export { output } => {
            let config = Config::from_env()?;
            println!("Export starting...");
            match run_export(&config, &output).await {
                Ok(report) => {
                    println!("Export complete.\nReport:");
                    println!("{:#?}", report);
                    std::process::exit(0);
                }
                Err(e) => {
                    eprintln!("[ERROR] Export failed: {e}");
                    std::process::exit(1);
                }
            }
        }
    }
}
