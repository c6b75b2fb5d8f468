use thiserror::Error;

/// Errors raised before any DNS query is issued.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain IDNA conversion failed for {domain}")]
    IdnaConversion {
        domain: String,
        #[source]
        source: idna::Errors,
    },
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: std::io::Error,
    },
}

impl AuthError {
    pub(crate) fn idna(domain: impl Into<String>, source: idna::Errors) -> Self {
        Self::IdnaConversion {
            domain: domain.into(),
            source,
        }
    }

    pub(crate) fn resolver_init(source: std::io::Error) -> Self {
        Self::ResolverInit { source }
    }
}

/// Failure of a single TXT query.
///
/// These never escape [`DomainAuthResolver`](super::DomainAuthResolver); each
/// one is folded into the [`LookupOutcome`](super::LookupOutcome) of the record
/// type that issued it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no TXT records found for {name}: {detail}")]
    NoRecords { name: String, detail: String },
    #[error("TXT lookup failed for {name}: {detail}")]
    Query { name: String, detail: String },
    #[error("TXT record {name} contains invalid UTF-8 data: {source}")]
    TxtDataUtf8 {
        name: String,
        #[source]
        source: std::str::Utf8Error,
    },
}

impl LookupError {
    pub fn no_records(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::NoRecords {
            name: name.into(),
            detail: detail.into(),
        }
    }

    pub fn query(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Query {
            name: name.into(),
            detail: detail.into(),
        }
    }

    pub(crate) fn txt_data_utf8(name: impl Into<String>, source: std::str::Utf8Error) -> Self {
        Self::TxtDataUtf8 {
            name: name.into(),
            source,
        }
    }

    /// True when DNS answered authoritatively that nothing is published.
    pub fn is_absence(&self) -> bool {
        matches!(self, Self::NoRecords { .. })
    }
}
