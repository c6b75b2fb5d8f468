use super::{LookupError, LookupOutcome, RecordKind, TxtRecordSet, outcome};

/// `<selector>._domainkey`, to be joined onto the domain with `fqdn`.
pub(crate) fn selector_label(selector: &str) -> String {
    format!("{}._domainkey", selector)
}

/// DKIM key records carry no mandatory leading tag, so every record at the
/// selector name is reported.
pub(crate) fn evaluate(name: &str, answer: Result<TxtRecordSet, LookupError>) -> LookupOutcome {
    match answer {
        Ok(records) => outcome::unfiltered(name, records),
        Err(err) => outcome::from_error(RecordKind::Dkim, err),
    }
}
