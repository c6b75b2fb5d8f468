use tracing::{debug, warn};

use super::{LookupError, LookupOutcome, RecordKind, TxtRecordSet};

/// Keeps the records whose concatenated content starts with `prefix`.
pub(crate) fn filter_prefixed(name: &str, prefix: &str, records: TxtRecordSet) -> LookupOutcome {
    let total = records.len();
    let matching: TxtRecordSet = records
        .into_iter()
        .filter(|record| record.starts_with(prefix))
        .collect();

    if matching.is_empty() {
        return LookupOutcome::Absent {
            reason: format!("no TXT record starting with {prefix} among {total} record(s) at {name}"),
            answered: true,
        };
    }
    LookupOutcome::Found { records: matching }
}

pub(crate) fn unfiltered(name: &str, records: TxtRecordSet) -> LookupOutcome {
    if records.is_empty() {
        return LookupOutcome::Absent {
            reason: format!("empty TXT answer at {name}"),
            answered: true,
        };
    }
    LookupOutcome::Found { records }
}

pub(crate) fn from_error(kind: RecordKind, err: LookupError) -> LookupOutcome {
    if err.is_absence() {
        debug!(%kind, error = %err, "record absent");
        LookupOutcome::Absent {
            reason: err.to_string(),
            answered: false,
        }
    } else {
        warn!(%kind, error = %err, "TXT query failed");
        LookupOutcome::QueryError {
            detail: err.to_string(),
        }
    }
}
