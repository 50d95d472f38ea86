use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};

/// Output key for the hotel identifier.
pub const HOTEL_ID_KEY: &str = "hotel_id";
/// Output key for the destination identifier.
pub const DESTINATION_ID_KEY: &str = "destination_id";

// ---------------------------------------------------------------------------
// Raw supplier record
// ---------------------------------------------------------------------------

/// One supplier entry for one hotel at one destination, keys in supplier order.
///
/// The first entry is the hotel id and the second the destination id, whatever
/// the supplier names them. Everything after those two is an attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    entries: Map<String, Value>,
}

impl RawRecord {
    /// Accept a JSON object; anything else is not a record.
    pub fn from_value(v: Value) -> Option<Self> {
        match v {
            Value::Object(entries) => Some(Self { entries }),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Positional hotel id (entry 0), coerced to text. `None` if absent or empty.
    pub fn hotel_id(&self) -> Option<String> {
        self.entries.values().next().and_then(identifier_text)
    }

    /// Positional destination id (entry 1), coerced to text. `None` if absent or empty.
    pub fn destination_id(&self) -> Option<String> {
        self.entries.values().nth(1).and_then(identifier_text)
    }

    /// Every entry after the two identifier positions.
    pub fn attributes(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter().skip(2)
    }
}

fn identifier_text(v: &Value) -> Option<String> {
    let text = match v {
        Value::Null => return None,
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

// ---------------------------------------------------------------------------
// Canonical record
// ---------------------------------------------------------------------------

/// Reconciled view of one hotel at one destination across all suppliers.
///
/// `hotel_id` and `destination_id` are fixed by the first record seen for the
/// pair; `fields` grows as later records are folded in.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRecord {
    pub hotel_id: String,
    pub destination_id: String,
    pub fields: Map<String, Value>,
}

impl CanonicalRecord {
    pub fn new(hotel_id: impl Into<String>, destination_id: impl Into<String>) -> Self {
        Self {
            hotel_id: hotel_id.into(),
            destination_id: destination_id.into(),
            fields: Map::new(),
        }
    }

    /// Seed a record from the attributes of `raw`.
    pub fn from_raw(hotel_id: String, destination_id: String, raw: &RawRecord) -> Self {
        let fields = raw
            .attributes()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Self {
            hotel_id,
            destination_id,
            fields,
        }
    }

    pub fn key_matches(&self, hotel_id: &str, destination_id: &str) -> bool {
        self.hotel_id == hotel_id && self.destination_id == destination_id
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// Serialized as one flat object: identifiers first, then fields in insertion
/// order. A field named like an identifier key is dropped.
impl Serialize for CanonicalRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = self
            .fields
            .keys()
            .filter(|k| !is_identifier_key(k))
            .count();
        let mut map = serializer.serialize_map(Some(2 + extra))?;
        map.serialize_entry(HOTEL_ID_KEY, &self.hotel_id)?;
        map.serialize_entry(DESTINATION_ID_KEY, &self.destination_id)?;
        for (k, v) in &self.fields {
            if !is_identifier_key(k) {
                map.serialize_entry(k, v)?;
            }
        }
        map.end()
    }
}

fn is_identifier_key(k: &str) -> bool {
    k == HOTEL_ID_KEY || k == DESTINATION_ID_KEY
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Why a raw record was not reconciled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SkipReason {
    MissingHotelId,
    MissingDestinationId,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::MissingHotelId => "missing_hotel_id",
            SkipReason::MissingDestinationId => "missing_destination_id",
        }
    }
}

/// What [`crate::reconcile`] did with one raw record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// A new canonical record was appended at `index`.
    Created { index: usize },
    /// Fields were folded into the existing record at `index`.
    Merged { index: usize },
    Skipped(SkipReason),
}
