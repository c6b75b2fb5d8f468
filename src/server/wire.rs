//! JSON shape of `GET /api/check-domain`.
//!
//! Found outcomes are arrays of records (each an array of segments), and so
//! is an answered lookup with nothing matching (`[]`). Failed lookups collapse
//! to a `"<KIND> record not found: ..."` string.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::auth::{AuthCheckResult, LookupOutcome, RecordKind, TxtRecord};

pub struct LegacyCheckResult<'a>(pub &'a AuthCheckResult);

impl Serialize for LegacyCheckResult<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LegacyCheckResult", 3)?;
        for kind in [RecordKind::Spf, RecordKind::Dmarc, RecordKind::Dkim] {
            let outcome = LegacyOutcome {
                kind,
                outcome: self.0.outcome(kind),
            };
            state.serialize_field(kind.label(), &outcome)?;
        }
        state.end()
    }
}

struct LegacyOutcome<'a> {
    kind: RecordKind,
    outcome: &'a LookupOutcome,
}

impl Serialize for LegacyOutcome<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.outcome {
            LookupOutcome::Found { records } => records.serialize(serializer),
            LookupOutcome::Absent { answered: true, .. } => {
                let none: [TxtRecord; 0] = [];
                none.serialize(serializer)
            }
            LookupOutcome::Absent { reason: text, .. }
            | LookupOutcome::QueryError { detail: text } => {
                serializer.serialize_str(&format!("{} record not found: {}", self.kind, text))
            }
        }
    }
}
