//! Per-appraiser rollup of the anomalous subset.
//!
//! Produces one summary row per distinct signer appearing in the
//! anomalous subset, with totals drawn from the full dataset.

use std::collections::HashMap;

use tracing::warn;

use crate::models::{AppraiserSummary, ReportRecord};

/// Separator used when joining firm and cluster sets for display.
const DISPLAY_SEPARATOR: &str = ", ";

/// Per-signer accumulation while walking the anomalous subset.
struct Rollup<'a> {
    anomaly_reports: usize,
    firms: Vec<&'a str>,
    clusters: Vec<i64>,
}

/// Summarize the anomalous subset by appraiser.
///
/// Rows come out in first-appearance order within `anomalous`, ranked
/// from 1. Firms and clusters are deduplicated preserving the order
/// they were first seen. Totals per signer are counted over
/// `all_records`, so the percentage relates anomalies to the signer's
/// whole body of work.
pub fn aggregate(all_records: &[ReportRecord], anomalous: &[ReportRecord]) -> Vec<AppraiserSummary> {
    let mut total_counts: HashMap<&str, usize> = HashMap::new();
    for record in all_records {
        *total_counts.entry(record.signer_name.as_str()).or_default() += 1;
    }

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut names: Vec<&str> = Vec::new();
    let mut rollups: Vec<Rollup> = Vec::new();

    for record in anomalous {
        let slot = *index
            .entry(record.signer_name.as_str())
            .or_insert_with(|| {
                names.push(record.signer_name.as_str());
                rollups.push(Rollup {
                    anomaly_reports: 0,
                    firms: Vec::new(),
                    clusters: Vec::new(),
                });
                rollups.len() - 1
            });

        let rollup = &mut rollups[slot];
        rollup.anomaly_reports += 1;
        if !rollup.firms.contains(&record.firm_name.as_str()) {
            rollup.firms.push(record.firm_name.as_str());
        }
        if !rollup.clusters.contains(&record.cluster_id) {
            rollup.clusters.push(record.cluster_id);
        }
    }

    let mut summaries = Vec::with_capacity(names.len());
    for (name, rollup) in names.into_iter().zip(rollups) {
        let total_reports = total_counts.get(name).copied().unwrap_or(0);
        if total_reports == 0 {
            // A signer in the anomalous subset must also appear in the
            // full dataset; skip the row rather than divide by zero.
            warn!(
                "signer {:?} has anomalous reports but no dataset total; skipping",
                name
            );
            continue;
        }

        let anomaly_percent =
            ((rollup.anomaly_reports as f64 / total_reports as f64) * 100.0).round() as u32;

        summaries.push(AppraiserSummary {
            rank: summaries.len() + 1,
            appraiser_name: name.to_string(),
            firms: rollup.firms.join(DISPLAY_SEPARATOR),
            total_reports,
            anomaly_reports: rollup.anomaly_reports,
            anomaly_percent,
            clusters: rollup
                .clusters
                .iter()
                .map(|cluster| cluster.to_string())
                .collect::<Vec<_>>()
                .join(DISPLAY_SEPARATOR),
        });
    }

    summaries
}
