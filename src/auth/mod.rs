//! SPF / DMARC / DKIM TXT lookups for a single domain.
//!
//! [`DomainAuthResolver`] wraps any [`LookupTxt`] implementation. Each of the
//! three lookups turns its own DNS failure into a [`LookupOutcome`], so
//! [`DomainAuthResolver::check_domain`] always reports all three.

mod dkim;
mod dmarc;
mod error;
mod outcome;
mod resolver;
mod spf;
mod types;

pub use dmarc::DMARC_PREFIX;
pub use error::{AuthError, LookupError};
pub use resolver::{LookupTxt, Nameservers, ResolverSettings};
pub use spf::SPF_PREFIX;
pub use types::{
    AuthCheckResult, DEFAULT_SELECTOR, DomainAuthQuery, LookupOutcome, RecordKind, TxtRecord,
    TxtRecordSet,
};

use resolver::fqdn;
use tracing::{debug, info};
use trust_dns_resolver::TokioAsyncResolver;

/// Checks `domain` (and DKIM `selector`, `"default"` when `None`) against the
/// system resolver.
pub async fn check_domain(
    domain: &str,
    selector: Option<&str>,
) -> Result<AuthCheckResult, AuthError> {
    let query = DomainAuthQuery::new(domain, selector)?;
    let resolver = DomainAuthResolver::from_system_conf()?;
    Ok(resolver.check_domain(&query).await)
}

#[derive(Debug, Clone)]
pub struct DomainAuthResolver<R> {
    lookup: R,
}

impl DomainAuthResolver<TokioAsyncResolver> {
    pub fn from_system_conf() -> Result<Self, AuthError> {
        Self::from_settings(&ResolverSettings::default())
    }

    pub fn from_settings(settings: &ResolverSettings) -> Result<Self, AuthError> {
        Ok(Self::new(settings.build()?))
    }
}

impl<R> DomainAuthResolver<R>
where
    R: LookupTxt,
{
    pub fn new(lookup: R) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &R {
        &self.lookup
    }

    /// TXT records at `domain` starting with `v=spf1`.
    pub async fn resolve_spf(&self, domain: &str) -> LookupOutcome {
        let answer = self.lookup.lookup_txt(domain).await;
        spf::evaluate(domain, answer)
    }

    /// TXT records at `_dmarc.<domain>` starting with `v=DMARC1`.
    pub async fn resolve_dmarc(&self, domain: &str) -> LookupOutcome {
        let name = fqdn(dmarc::DMARC_LABEL, domain);
        let answer = self.lookup.lookup_txt(&name).await;
        dmarc::evaluate(&name, answer)
    }

    /// Every TXT record at `<selector>._domainkey.<domain>`.
    pub async fn resolve_dkim(&self, domain: &str, selector: &str) -> LookupOutcome {
        let name = fqdn(&dkim::selector_label(selector), domain);
        let answer = self.lookup.lookup_txt(&name).await;
        dkim::evaluate(&name, answer)
    }

    pub async fn check_domain(&self, query: &DomainAuthQuery) -> AuthCheckResult {
        debug!(domain = query.domain(), selector = query.selector(), "checking domain");
        let (spf, dmarc, dkim) = tokio::join!(
            self.resolve_spf(query.domain()),
            self.resolve_dmarc(query.domain()),
            self.resolve_dkim(query.domain(), query.selector()),
        );
        let result = AuthCheckResult::new(query, spf, dmarc, dkim);
        info!(
            domain = query.domain(),
            selector = query.selector(),
            spf = result.spf.is_found(),
            dmarc = result.dmarc.is_found(),
            dkim = result.dkim.is_found(),
            "domain checked"
        );
        result
    }
}

#[cfg(test)]
mod tests;
