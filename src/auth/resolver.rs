use std::future::Future;
use std::time::Duration;

use tracing::debug;
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{ResolverConfig, ResolverOpts},
    error::{ResolveError, ResolveErrorKind},
    lookup::TxtLookup,
};

use super::{AuthError, LookupError, TxtRecord, TxtRecordSet};

pub(crate) fn normalize_domain(domain: &str) -> Result<String, AuthError> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(AuthError::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(|err| AuthError::idna(trimmed, err))
}

pub(crate) fn fqdn(label: &str, domain: &str) -> String {
    let trimmed = label.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        domain.to_string()
    } else {
        format!("{}.{}", trimmed.to_ascii_lowercase(), domain)
    }
}

/// DNS TXT query capability used by [`DomainAuthResolver`](super::DomainAuthResolver).
///
/// Implemented for [`TokioAsyncResolver`]; tests plug in an in-memory table.
pub trait LookupTxt: Send + Sync {
    fn lookup_txt(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<TxtRecordSet, LookupError>> + Send;
}

impl LookupTxt for TokioAsyncResolver {
    async fn lookup_txt(&self, name: &str) -> Result<TxtRecordSet, LookupError> {
        let lookup = TokioAsyncResolver::txt_lookup(self, name)
            .await
            .map_err(|err| classify_error(name, &err))?;
        collect_txt_records(name, &lookup)
    }
}

pub(crate) fn collect_txt_records(
    name: &str,
    lookup: &TxtLookup,
) -> Result<TxtRecordSet, LookupError> {
    let mut records = Vec::new();
    for txt in lookup.iter() {
        let mut segments = Vec::with_capacity(txt.txt_data().len());
        for piece in txt.txt_data().iter() {
            let segment = std::str::from_utf8(piece.as_ref())
                .map_err(|err| LookupError::txt_data_utf8(name, err))?;
            segments.push(segment.to_string());
        }
        records.push(TxtRecord::new(segments));
    }
    debug!(query = name, count = records.len(), "TXT lookup answered");
    Ok(records)
}

pub(crate) fn classify_error(name: &str, err: &ResolveError) -> LookupError {
    if matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. }) {
        LookupError::no_records(name, err.to_string())
    } else {
        LookupError::query(name, err.to_string())
    }
}

/// Upstream nameservers the resolver sends queries to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Nameservers {
    /// `/etc/resolv.conf` (or the platform equivalent)
    #[default]
    System,
    Google,
    Cloudflare,
    Quad9,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverSettings {
    pub nameservers: Nameservers,
    pub timeout: Duration,
    pub attempts: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            nameservers: Nameservers::System,
            timeout: Duration::from_secs(5),
            attempts: 2,
        }
    }
}

impl ResolverSettings {
    pub(crate) fn build(&self) -> Result<TokioAsyncResolver, AuthError> {
        let (config, mut opts) = match self.nameservers {
            Nameservers::System => trust_dns_resolver::system_conf::read_system_conf()
                .map_err(AuthError::resolver_init)?,
            Nameservers::Google => (ResolverConfig::google(), ResolverOpts::default()),
            Nameservers::Cloudflare => (ResolverConfig::cloudflare(), ResolverOpts::default()),
            Nameservers::Quad9 => (ResolverConfig::quad9(), ResolverOpts::default()),
        };
        opts.timeout = self.timeout;
        opts.attempts = self.attempts.max(1);
        // every check must observe live DNS
        opts.cache_size = 0;
        debug!(
            nameservers = ?self.nameservers,
            timeout_ms = self.timeout.as_millis() as u64,
            attempts = opts.attempts,
            "building TXT resolver"
        );
        Ok(TokioAsyncResolver::tokio(config, opts))
    }
}
