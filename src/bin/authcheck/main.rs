//! authcheck: SPF / DMARC / DKIM lookups from the command line.
//!
//! Exit codes: 0 every record found, 2 at least one absent or failed, 1 fatal.

mod args;
mod batch;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use domain_authcheck::config::init_tracing;
use domain_authcheck::{DomainAuthQuery, DomainAuthResolver};
use tracing::debug;

use crate::args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format, "warn");

    let settings = cli.resolver.settings();
    let resolver = DomainAuthResolver::from_settings(&settings).context("build resolver")?;

    let rows = match &cli.cmd {
        Commands::Check { domain, selector } => {
            let query = DomainAuthQuery::new(domain, selector.as_deref())
                .with_context(|| format!("invalid domain {domain:?}"))?;
            vec![resolver.check_domain(&query).await]
        }
        Commands::Batch { file, concurrency } => {
            let queries = batch::load(file)?;
            debug!(count = queries.len(), "batch loaded");
            batch::run(&resolver, &queries, *concurrency).await
        }
    };

    output::print(&rows, &cli.format)?;

    if rows.iter().any(|row| !row.all_found()) {
        std::process::exit(2);
    }
    Ok(())
}
