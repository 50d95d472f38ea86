//! Aggregation driver and identifier filter.
//!
//! Supplier batches are folded one record at a time into a single working set
//! owned by [`Aggregator`]. Fetching may happen concurrently upstream, but the
//! batches must be handed here sequentially: reconcile scans then mutates.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::engine::reconcile;
use crate::{CanonicalRecord, RawRecord, ReconcileOutcome};

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Counters for one aggregation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AggregationSummary {
    pub records_seen: usize,
    pub created: usize,
    pub merged: usize,
    pub skipped: usize,
}

/// Owns the canonical working set for one run.
#[derive(Debug, Default)]
pub struct Aggregator {
    records: Vec<CanonicalRecord>,
    summary: AggregationSummary,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest one supplier batch in arrival order.
    pub fn ingest<I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = RawRecord>,
    {
        for record in batch {
            self.ingest_one(&record);
        }
    }

    pub fn ingest_one(&mut self, record: &RawRecord) -> ReconcileOutcome {
        let outcome = reconcile(&mut self.records, record);
        self.summary.records_seen += 1;
        match outcome {
            ReconcileOutcome::Created { .. } => self.summary.created += 1,
            ReconcileOutcome::Merged { .. } => self.summary.merged += 1,
            ReconcileOutcome::Skipped(_) => self.summary.skipped += 1,
        }
        outcome
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn summary(&self) -> AggregationSummary {
        self.summary
    }

    pub fn into_records(self) -> Vec<CanonicalRecord> {
        self.records
    }
}

/// Feed every batch, in supplier order, through one shared working set.
pub fn run<B, I>(supplier_fetches: B) -> Vec<CanonicalRecord>
where
    B: IntoIterator<Item = I>,
    I: IntoIterator<Item = RawRecord>,
{
    run_with_summary(supplier_fetches).0
}

/// [`run`], also returning the run counters.
pub fn run_with_summary<B, I>(supplier_fetches: B) -> (Vec<CanonicalRecord>, AggregationSummary)
where
    B: IntoIterator<Item = I>,
    I: IntoIterator<Item = RawRecord>,
{
    let mut agg = Aggregator::new();
    for batch in supplier_fetches {
        agg.ingest(batch);
    }
    let summary = agg.summary();
    (agg.into_records(), summary)
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Hotel / destination identifier sets. Both empty means no filtering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub hotel_ids: BTreeSet<String>,
    pub destination_ids: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new<H, D>(hotel_ids: H, destination_ids: D) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            hotel_ids: hotel_ids.into_iter().map(Into::into).collect(),
            destination_ids: destination_ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hotel_ids.is_empty() && self.destination_ids.is_empty()
    }

    /// Conjunction: both identifiers must be listed. An empty dimension
    /// matches nothing unless the whole criteria is empty.
    pub fn matches(&self, record: &CanonicalRecord) -> bool {
        self.hotel_ids.contains(&record.hotel_id)
            && self.destination_ids.contains(&record.destination_id)
    }
}

/// Keep the records matching `criteria`, preserving order.
pub fn filter(state: Vec<CanonicalRecord>, criteria: &FilterCriteria) -> Vec<CanonicalRecord> {
    if criteria.is_empty() {
        return state;
    }
    state.into_iter().filter(|r| criteria.matches(r)).collect()
}
