//! Parsing and application of the cluster-selection input.

use std::collections::BTreeSet;

use crate::error::SelectionError;
use crate::models::ReportRecord;

/// A parsed cluster-selection input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterSelection {
    /// Blank input: no filtering; callers render the unfiltered default view.
    None,
    /// Filter to records whose cluster id is in the set.
    Clusters(BTreeSet<i64>),
}

impl ClusterSelection {
    /// Parse free-text, comma-separated cluster numbers.
    ///
    /// Tokens are trimmed before parsing. The first token that is not an
    /// integer fails the whole parse; no partial selection is produced.
    pub fn parse(input: &str) -> Result<Self, SelectionError> {
        if input.trim().is_empty() {
            return Ok(ClusterSelection::None);
        }

        let mut clusters = BTreeSet::new();
        for token in input.split(',') {
            let token = token.trim();
            let id: i64 = token
                .parse()
                .map_err(|_| SelectionError::InvalidClusterId {
                    token: token.to_string(),
                })?;
            clusters.insert(id);
        }

        Ok(ClusterSelection::Clusters(clusters))
    }
}

/// Filter records to the given clusters, preserving input order.
///
/// An empty result is valid: the selection may name clusters that no
/// record belongs to.
pub fn select(records: &[ReportRecord], clusters: &BTreeSet<i64>) -> Vec<ReportRecord> {
    records
        .iter()
        .filter(|record| clusters.contains(&record.cluster_id))
        .cloned()
        .collect()
}
