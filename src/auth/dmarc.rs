use super::{LookupError, LookupOutcome, RecordKind, TxtRecordSet, outcome};

pub const DMARC_PREFIX: &str = "v=DMARC1";
pub(crate) const DMARC_LABEL: &str = "_dmarc";

pub(crate) fn evaluate(name: &str, answer: Result<TxtRecordSet, LookupError>) -> LookupOutcome {
    match answer {
        Ok(records) => outcome::filter_prefixed(name, DMARC_PREFIX, records),
        Err(err) => outcome::from_error(RecordKind::Dmarc, err),
    }
}
