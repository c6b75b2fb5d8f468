use std::path::PathBuf;

use clap::{Parser, Subcommand};
use domain_authcheck::config::{LogFormat, ResolverArgs};

#[derive(Parser)]
#[command(name = "authcheck", version)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,

    /// format: human|json|ndjson
    #[arg(long, global = true, default_value = "human")]
    pub format: String,

    /// diagnostics on stderr: pretty|json (filter with RUST_LOG)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(flatten)]
    pub resolver: ResolverArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// SPF, DMARC and DKIM lookup for one domain
    Check {
        domain: String,
        /// DKIM selector (defaults to "default")
        #[arg(long)]
        selector: Option<String>,
    },
    /// every domain of a JSON file: {"example.com": {"selector": "google"}, ...}
    Batch {
        file: PathBuf,
        /// domains checked at the same time
        #[arg(long, default_value_t = 8)]
        concurrency: usize,
    },
}
