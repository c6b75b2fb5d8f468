//! Command-line / environment knobs shared by the CLI and the HTTP server.

use std::time::Duration;

use clap::{Args, ValueEnum};

use crate::auth::{Nameservers, ResolverSettings};

#[derive(Debug, Clone, Args)]
pub struct ResolverArgs {
    /// upstream nameservers: system|google|cloudflare|quad9
    #[arg(long, env = "AUTHCHECK_NAMESERVERS", value_enum, default_value_t = Nameservers::System)]
    pub nameservers: Nameservers,

    /// per-query DNS timeout, in seconds (at least 1)
    #[arg(long, env = "AUTHCHECK_DNS_TIMEOUT_SECS", default_value_t = 5)]
    pub dns_timeout_secs: u64,

    /// DNS attempts per query before giving up
    #[arg(long, env = "AUTHCHECK_DNS_ATTEMPTS", default_value_t = 2)]
    pub dns_attempts: usize,
}

impl ResolverArgs {
    pub fn settings(&self) -> ResolverSettings {
        ResolverSettings {
            nameservers: self.nameservers,
            timeout: Duration::from_secs(self.dns_timeout_secs.max(1)),
            attempts: self.dns_attempts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Installs the global `tracing` subscriber. `RUST_LOG` wins over
/// `default_filter`.
pub fn init_tracing(format: LogFormat, default_filter: &str) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
