use std::path::Path;

use anyhow::Result;
#[cfg(feature = "with-serde")]
use anyhow::Context;
use domain_authcheck::{AuthCheckResult, DomainAuthQuery, DomainAuthResolver, LookupTxt};
use futures::{StreamExt, stream};

/// Domains listed in a batch file, sorted by name.
#[cfg(feature = "with-serde")]
pub fn load(path: &Path) -> Result<Vec<DomainAuthQuery>> {
    use std::collections::BTreeMap;

    #[derive(serde::Deserialize)]
    struct Entry {
        #[serde(default)]
        selector: Option<String>,
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read {}", path.display()))?;
    let entries: BTreeMap<String, Entry> = serde_json::from_str(&raw)
        .with_context(|| format!("parse {}", path.display()))?;

    entries
        .iter()
        .map(|(domain, entry)| {
            DomainAuthQuery::new(domain, entry.selector.as_deref())
                .with_context(|| format!("invalid domain {domain:?} in {}", path.display()))
        })
        .collect()
}

#[cfg(not(feature = "with-serde"))]
pub fn load(_path: &Path) -> Result<Vec<DomainAuthQuery>> {
    anyhow::bail!("batch nécessite la feature 'with-serde'")
}

/// Checks every query, at most `concurrency` at a time, keeping input order.
pub async fn run<R>(
    resolver: &DomainAuthResolver<R>,
    queries: &[DomainAuthQuery],
    concurrency: usize,
) -> Vec<AuthCheckResult>
where
    R: LookupTxt,
{
    stream::iter(queries)
        .map(|query| resolver.check_domain(query))
        .buffered(concurrency.max(1))
        .collect()
        .await
}
