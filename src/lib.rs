#![forbid(unsafe_code)]
//! domain_authcheck — SPF / DMARC / DKIM TXT record lookup for a domain

pub mod auth;
pub mod config;

pub use auth::{
    AuthCheckResult, AuthError, DEFAULT_SELECTOR, DomainAuthQuery, DomainAuthResolver,
    LookupError, LookupOutcome, LookupTxt, Nameservers, RecordKind, ResolverSettings, TxtRecord,
    TxtRecordSet, check_domain,
};

#[cfg(feature = "server")]
pub mod server;
