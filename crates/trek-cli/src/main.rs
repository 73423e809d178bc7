mod cli;
mod config;
mod output;
mod run;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use trek_core::{ClientConfig, TrekScraper};

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref())?;
    let scraper = TrekScraper::with_config(ClientConfig::default(), config)?;

    // Dropping the run future abandons the series in flight; its file is
    // only written once extraction completes.
    tokio::select! {
        result = run::run(&scraper, &cli) => {
            let summary = result?;
            info!(
                extracted = summary.extracted,
                skipped = summary.skipped,
                failed = summary.failed,
                "done"
            );
            Ok(())
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted, stopping");
            bail!("Interrupted")
        }
    }
}
