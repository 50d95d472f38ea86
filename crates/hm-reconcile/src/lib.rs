//! hm-reconcile
//!
//! Record reconciliation engine for supplier hotel metadata.
//!
//! Suppliers describe the same hotel with their own field names and value
//! shapes. This crate folds those records into one [`CanonicalRecord`] per
//! `(hotel_id, destination_id)` pair and filters the result set.
//!
//! - Identity is positional: the first two entries of a supplier record are
//!   the hotel id and destination id, whatever the supplier calls them.
//! - Field names and values are matched with a word-set / substring heuristic
//!   ([`equivalent`]); first match wins.
//! - Malformed input is skipped or merged best-effort. Nothing here returns
//!   an error.
//!
//! Deterministic, single-threaded, pure logic. No IO.

mod engine;
mod equivalence;
mod pipeline;
mod types;
mod value;

pub use engine::reconcile;
pub use equivalence::{equivalent, equivalent_text};
pub use pipeline::{
    filter, run, run_with_summary, AggregationSummary, Aggregator, FilterCriteria,
};
pub use types::*;
pub use value::{merge, value_text, FieldValue};
