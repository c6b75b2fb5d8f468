use super::{AuthError, resolver::normalize_domain};

pub const DEFAULT_SELECTOR: &str = "default";

/// A domain (ASCII form) and the DKIM selector to look up on it.
///
/// Deserialization goes through [`DomainAuthQuery::new`].
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(try_from = "RawQuery"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainAuthQuery {
    domain: String,
    selector: String,
}

impl DomainAuthQuery {
    /// Normalizes `domain` through IDNA; a missing or blank selector falls
    /// back to [`DEFAULT_SELECTOR`].
    pub fn new(domain: &str, selector: Option<&str>) -> Result<Self, AuthError> {
        let domain = normalize_domain(domain)?;
        let selector = selector
            .and_then(normalize_selector)
            .unwrap_or_else(|| DEFAULT_SELECTOR.to_string());
        Ok(Self { domain, selector })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }
}

#[cfg(feature = "with-serde")]
#[derive(serde::Deserialize)]
struct RawQuery {
    domain: String,
    #[serde(default)]
    selector: Option<String>,
}

#[cfg(feature = "with-serde")]
impl TryFrom<RawQuery> for DomainAuthQuery {
    type Error = AuthError;

    fn try_from(raw: RawQuery) -> Result<Self, Self::Error> {
        Self::new(&raw.domain, raw.selector.as_deref())
    }
}

fn normalize_selector(input: &str) -> Option<String> {
    let trimmed = input.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_ascii_lowercase())
}

/// One TXT resource record, kept as the character-strings DNS delivered.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "with-serde", serde(transparent))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TxtRecord(Vec<String>);

impl TxtRecord {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Segments joined without separator, the form record parsers inspect.
    pub fn content(&self) -> String {
        self.0.concat()
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.content().starts_with(prefix)
    }
}

impl From<&str> for TxtRecord {
    fn from(value: &str) -> Self {
        Self(vec![value.to_string()])
    }
}

pub type TxtRecordSet = Vec<TxtRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Spf,
    Dmarc,
    Dkim,
}

impl RecordKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Spf => "SPF",
            Self::Dmarc => "DMARC",
            Self::Dkim => "DKIM",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "with-serde",
    serde(tag = "status", rename_all = "snake_case")
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found { records: TxtRecordSet },
    Absent {
        reason: String,
        /// DNS answered with TXT data, none of it matching.
        #[cfg_attr(feature = "with-serde", serde(skip))]
        answered: bool,
    },
    QueryError { detail: String },
}

impl LookupOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn records(&self) -> &[TxtRecord] {
        match self {
            Self::Found { records } => records.as_slice(),
            Self::Absent { .. } | Self::QueryError { .. } => &[],
        }
    }

    /// Human-readable text for non-found outcomes.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Found { .. } => None,
            Self::Absent { reason, .. } => Some(reason),
            Self::QueryError { detail } => Some(detail),
        }
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCheckResult {
    pub domain: String,
    pub selector: String,
    #[cfg_attr(feature = "with-serde", serde(rename = "SPF"))]
    pub spf: LookupOutcome,
    #[cfg_attr(feature = "with-serde", serde(rename = "DMARC"))]
    pub dmarc: LookupOutcome,
    #[cfg_attr(feature = "with-serde", serde(rename = "DKIM"))]
    pub dkim: LookupOutcome,
}

impl AuthCheckResult {
    pub(crate) fn new(
        query: &DomainAuthQuery,
        spf: LookupOutcome,
        dmarc: LookupOutcome,
        dkim: LookupOutcome,
    ) -> Self {
        Self {
            domain: query.domain().to_string(),
            selector: query.selector().to_string(),
            spf,
            dmarc,
            dkim,
        }
    }

    pub fn outcome(&self, kind: RecordKind) -> &LookupOutcome {
        match kind {
            RecordKind::Spf => &self.spf,
            RecordKind::Dmarc => &self.dmarc,
            RecordKind::Dkim => &self.dkim,
        }
    }

    pub fn all_found(&self) -> bool {
        self.spf.is_found() && self.dmarc.is_found() && self.dkim.is_found()
    }
}
