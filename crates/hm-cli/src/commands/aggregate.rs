use std::time::Duration;

use hm_config::AggregatorConfig;
use hm_reconcile::{filter, run_with_summary, CanonicalRecord, FilterCriteria};
use hm_suppliers::{fetch_all, FetchRequest, HttpSupplier, Supplier};
use tracing::info;

/// Fetch every configured supplier, reconcile the batches in supplier order
/// and apply the identifier filter.
///
/// Supplier failures are already absorbed by [`Supplier::fetch`]; this never fails.
pub async fn execute(
    config: &AggregatorConfig,
    hotel_ids: Vec<String>,
    destination_ids: Vec<String>,
) -> Vec<CanonicalRecord> {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let suppliers: Vec<Box<dyn Supplier>> = config
        .suppliers
        .iter()
        .map(|endpoint| {
            Box::new(HttpSupplier::from_endpoint(endpoint, timeout)) as Box<dyn Supplier>
        })
        .collect();

    let criteria = FilterCriteria::new(
        hotel_ids.iter().cloned(),
        destination_ids.iter().cloned(),
    );
    let req = FetchRequest::new(hotel_ids, destination_ids);

    let batches = fetch_all(&suppliers, &req).await;
    info!(suppliers = batches.len(), "supplier batches received");

    let (records, summary) = run_with_summary(batches);
    info!(
        records_seen = summary.records_seen,
        created = summary.created,
        merged = summary.merged,
        skipped = summary.skipped,
        "aggregation complete"
    );

    filter(records, &criteria)
}
