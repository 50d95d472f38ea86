use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::equivalence::equivalent;
use crate::value::merge;
use crate::{CanonicalRecord, RawRecord, ReconcileOutcome, SkipReason};

/// Fold one supplier record into the canonical working set.
///
/// 1. Identifiers are taken positionally; a record missing either is skipped.
/// 2. The working set is scanned linearly for an exact `(hotel_id, destination_id)` match.
/// 3. On a match every attribute is merged into the record's fields: exact key
///    first, then the first equivalent key, else a new key.
/// 4. Otherwise a new canonical record is appended.
pub fn reconcile(state: &mut Vec<CanonicalRecord>, record: &RawRecord) -> ReconcileOutcome {
    let Some(hotel_id) = record.hotel_id() else {
        return skip(record, SkipReason::MissingHotelId);
    };
    let Some(destination_id) = record.destination_id() else {
        return skip(record, SkipReason::MissingDestinationId);
    };

    match state
        .iter()
        .position(|c| c.key_matches(&hotel_id, &destination_id))
    {
        Some(index) => {
            fold_attributes(&mut state[index].fields, record);
            debug!(%hotel_id, %destination_id, index, "merged supplier record");
            ReconcileOutcome::Merged { index }
        }
        None => {
            state.push(CanonicalRecord::from_raw(
                hotel_id.clone(),
                destination_id.clone(),
                record,
            ));
            let index = state.len() - 1;
            debug!(%hotel_id, %destination_id, index, "created canonical record");
            ReconcileOutcome::Created { index }
        }
    }
}

fn skip(record: &RawRecord, reason: SkipReason) -> ReconcileOutcome {
    warn!(
        reason = reason.as_str(),
        entries = record.len(),
        "skipping supplier record without identifiers"
    );
    ReconcileOutcome::Skipped(reason)
}

/// Exact key match first, then the first equivalent key in insertion order.
fn target_key(fields: &Map<String, Value>, key: &str) -> Option<String> {
    if fields.contains_key(key) {
        return Some(key.to_string());
    }
    fields.keys().find(|existing| equivalent(existing, key)).cloned()
}

fn fold_attributes(fields: &mut Map<String, Value>, record: &RawRecord) {
    for (key, value) in record.attributes() {
        match target_key(fields, key) {
            Some(target) => {
                if let Some(slot) = fields.get_mut(&target) {
                    let existing = std::mem::take(slot);
                    *slot = merge(existing, value.clone());
                }
            }
            None => {
                fields.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(v: Value) -> RawRecord {
        RawRecord::from_value(v).unwrap()
    }

    #[test]
    fn first_record_creates_canonical_without_identifier_fields() {
        let mut state = Vec::new();
        let out = reconcile(
            &mut state,
            &raw(json!({"Id": "iJhz", "DestinationId": 5432, "Name": "Beach Villas"})),
        );
        assert_eq!(out, ReconcileOutcome::Created { index: 0 });
        assert_eq!(state.len(), 1);
        assert_eq!(state[0].hotel_id, "iJhz");
        assert_eq!(state[0].destination_id, "5432");
        assert_eq!(state[0].fields.len(), 1);
        assert_eq!(state[0].get("Name"), Some(&json!("Beach Villas")));
    }

    #[test]
    fn same_pair_under_different_identifier_names_merges() {
        let mut state = Vec::new();
        reconcile(
            &mut state,
            &raw(json!({"Id": "iJhz", "DestinationId": 5432, "Name": "Beach Villas"})),
        );
        let out = reconcile(
            &mut state,
            &raw(json!({
                "hotel_id": "iJhz",
                "destination_id": "5432",
                "hotel_name": "Beach Villas Singapore"
            })),
        );
        assert_eq!(out, ReconcileOutcome::Merged { index: 0 });
        assert_eq!(state.len(), 1);
        // "Name" is not a substring of "hotel_name" (case) and the word sets differ,
        // so the field is new.
        assert_eq!(state[0].fields.len(), 2);
    }

    #[test]
    fn different_destination_is_a_different_record() {
        let mut state = Vec::new();
        reconcile(&mut state, &raw(json!({"id": "a", "dest": 1})));
        let out = reconcile(&mut state, &raw(json!({"id": "a", "dest": 2})));
        assert_eq!(out, ReconcileOutcome::Created { index: 1 });
    }

    #[test]
    fn first_equivalent_key_wins() {
        let mut state = Vec::new();
        reconcile(
            &mut state,
            &raw(json!({"id": "a", "dest": 1, "name": "Villa", "hotel name": "Villa X"})),
        );
        // "hotel_name" contains "name" which comes first in insertion order.
        reconcile(
            &mut state,
            &raw(json!({"id": "a", "dest": 1, "hotel_name": "Villa"})),
        );
        assert_eq!(state[0].get("name"), Some(&json!("Villa")));
        assert_eq!(state[0].get("hotel name"), Some(&json!("Villa X")));
        assert!(state[0].get("hotel_name").is_none());
    }

    #[test]
    fn missing_identifiers_are_skipped_without_touching_state() {
        let mut state = Vec::new();
        assert_eq!(
            reconcile(&mut state, &raw(json!({"id": null, "dest": 1, "name": "x"}))),
            ReconcileOutcome::Skipped(SkipReason::MissingHotelId)
        );
        assert_eq!(
            reconcile(&mut state, &raw(json!({"id": "a", "dest": ""}))),
            ReconcileOutcome::Skipped(SkipReason::MissingDestinationId)
        );
        assert!(state.is_empty());
    }
}
