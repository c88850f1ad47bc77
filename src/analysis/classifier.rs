//! Threshold-based classification of report records.

use crate::models::ReportRecord;

/// Whether a record's deviation strictly exceeds the threshold.
///
/// The appraiser table and the map markers both classify through this
/// one predicate, so the two views can never disagree.
pub fn is_anomalous(record: &ReportRecord, threshold: f64) -> bool {
    record.deviation_percent > threshold
}

/// Partition out the anomalous subsequence, preserving input order.
///
/// An empty input yields an empty output; so does any threshold at or
/// above the maximum deviation present.
pub fn classify(records: &[ReportRecord], threshold: f64) -> Vec<ReportRecord> {
    records
        .iter()
        .filter(|record| is_anomalous(record, threshold))
        .cloned()
        .collect()
}
