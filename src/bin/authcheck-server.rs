//! authcheck-server: HTTP API answering SPF / DMARC / DKIM lookups.

use anyhow::{Context, Result};
use clap::Parser;
use domain_authcheck::DomainAuthResolver;
use domain_authcheck::config::init_tracing;
use domain_authcheck::server::{ApiServer, ServerConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();
    init_tracing(config.log_format, "domain_authcheck=info,tower_http=info");

    info!("Starting authcheck-server v{}", env!("CARGO_PKG_VERSION"));

    let settings = config.resolver.settings();
    let resolver = DomainAuthResolver::from_settings(&settings)
        .with_context(|| format!("building resolver ({:?})", settings.nameservers))?;

    ApiServer::from_config(resolver, &config)
        .run()
        .await
        .with_context(|| format!("serving on {}", config.listen_addr()))?;

    Ok(())
}
