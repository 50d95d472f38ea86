//! hm-suppliers
//!
//! Supplier boundary: the [`Supplier`] trait, an HTTP implementation and a
//! concurrent fan-out helper.
//!
//! A failing supplier never fails the run. [`Supplier::fetch`] logs the error
//! and yields an empty batch, which the reconciler treats like "nothing
//! matched". This crate does not reconcile anything itself.

mod http;

pub use http::HttpSupplier;

use std::fmt;

use futures_util::future::join_all;
use hm_reconcile::RawRecord;
use tracing::warn;

// ---------------------------------------------------------------------------
// Fetch request
// ---------------------------------------------------------------------------

/// Identifier filters forwarded to a supplier. Empty lists mean "no filter";
/// the supplier may return its whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchRequest {
    pub hotel_ids: Vec<String>,
    pub destination_ids: Vec<String>,
}

impl FetchRequest {
    pub fn new(hotel_ids: Vec<String>, destination_ids: Vec<String>) -> Self {
        Self {
            hotel_ids,
            destination_ids,
        }
    }

    /// Repeated `hotel_ids=<id>` / `destination_ids=<id>` query pairs.
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        self.hotel_ids
            .iter()
            .map(|id| ("hotel_ids", id.as_str()))
            .chain(
                self.destination_ids
                    .iter()
                    .map(|id| ("destination_ids", id.as_str())),
            )
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors a [`Supplier`] may hit while fetching. Contained at this boundary.
#[derive(Debug)]
pub enum SupplierError {
    /// Network, timeout or TLS failure.
    Transport(String),
    /// Non-success HTTP status.
    Status { code: u16 },
    /// Response body was not valid JSON.
    Decode(String),
    /// Valid JSON but not a list of records.
    Shape(String),
}

impl fmt::Display for SupplierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupplierError::Transport(msg) => write!(f, "transport error: {msg}"),
            SupplierError::Status { code } => write!(f, "http status {code}"),
            SupplierError::Decode(msg) => write!(f, "decode error: {msg}"),
            SupplierError::Shape(msg) => write!(f, "unexpected payload shape: {msg}"),
        }
    }
}

impl std::error::Error for SupplierError {}

// ---------------------------------------------------------------------------
// Supplier trait
// ---------------------------------------------------------------------------

/// Upstream hotel data supplier.
///
/// Object-safe so callers can hold `Vec<Box<dyn Supplier>>`.
#[async_trait::async_trait]
pub trait Supplier: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch raw records, surfacing failures.
    async fn try_fetch(&self, req: &FetchRequest) -> Result<Vec<RawRecord>, SupplierError>;

    /// Fetch raw records; any failure is logged and becomes an empty batch.
    async fn fetch(&self, req: &FetchRequest) -> Vec<RawRecord> {
        match self.try_fetch(req).await {
            Ok(records) => records,
            Err(error) => {
                warn!(supplier = self.name(), %error, "supplier fetch failed; using empty batch");
                Vec::new()
            }
        }
    }
}

/// Fetch from every supplier concurrently. Batches come back in supplier
/// order so they can be reconciled sequentially by a single owner.
pub async fn fetch_all(
    suppliers: &[Box<dyn Supplier>],
    req: &FetchRequest,
) -> Vec<Vec<RawRecord>> {
    join_all(suppliers.iter().map(|s| s.fetch(req))).await
}

/// Split a decoded payload into records. Non-object entries are dropped.
pub fn records_from_payload(
    supplier: &str,
    payload: serde_json::Value,
) -> Result<Vec<RawRecord>, SupplierError> {
    let entries = match payload {
        serde_json::Value::Array(entries) => entries,
        other => {
            return Err(SupplierError::Shape(format!(
                "expected a JSON array, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut out = Vec::with_capacity(entries.len());
    for (position, entry) in entries.into_iter().enumerate() {
        let kind = json_kind(&entry);
        match RawRecord::from_value(entry) {
            Some(record) => out.push(record),
            None => warn!(supplier, position, kind, "skipping non-object payload entry"),
        }
    }
    Ok(out)
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
