use super::{LookupError, LookupOutcome, RecordKind, TxtRecordSet, outcome};

pub const SPF_PREFIX: &str = "v=spf1";

pub(crate) fn evaluate(name: &str, answer: Result<TxtRecordSet, LookupError>) -> LookupOutcome {
    match answer {
        Ok(records) => outcome::filter_prefixed(name, SPF_PREFIX, records),
        Err(err) => outcome::from_error(RecordKind::Spf, err),
    }
}
