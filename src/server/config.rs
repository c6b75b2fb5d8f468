use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::{LogFormat, ResolverArgs};

/// HTTP front-end for the SPF / DMARC / DKIM checker.
#[derive(Debug, Clone, Parser)]
#[command(name = "authcheck-server", version)]
pub struct ServerConfig {
    /// address to bind
    #[arg(long, env = "AUTHCHECK_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// port to bind
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// directory served for paths outside /api (index.html on /)
    #[arg(long, env = "AUTHCHECK_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// upper bound on the three lookups of one request, in seconds
    #[arg(long, env = "AUTHCHECK_REQUEST_TIMEOUT_SECS", default_value_t = 15)]
    pub request_timeout_secs: u64,

    /// log output: pretty|json
    #[arg(long, env = "AUTHCHECK_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(flatten)]
    pub resolver: ResolverArgs,
}

impl ServerConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
