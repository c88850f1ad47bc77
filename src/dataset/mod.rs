//! Dataset loading and the in-memory record store.
//!
//! The report dataset is loaded from CSV once at startup, validated row
//! by row, and held read-only for the lifetime of the process. Every
//! downstream computation borrows from the store.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::DatasetError;
use crate::map;
use crate::models::{LatLon, ReportRecord, ThresholdRange};

/// Lowest selectable deviation threshold, in percent.
pub const MIN_THRESHOLD: f64 = 100.0;

/// Immutable owner of the report dataset.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<ReportRecord>,
    path: PathBuf,
}

impl RecordStore {
    /// Load the dataset from a CSV file, validating every row.
    ///
    /// Missing columns, unparseable fields, negative deviations, and an
    /// empty dataset are all fatal.
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let mut reader = csv::Reader::from_path(path).map_err(|source| DatasetError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut records = Vec::new();
        for (index, result) in reader.deserialize::<ReportRecord>().enumerate() {
            // The header occupies line 1, so data rows start at line 2.
            let row = index + 2;
            let record = result.map_err(|source| DatasetError::Malformed { row, source })?;

            if record.deviation_percent < 0.0 {
                return Err(DatasetError::NegativeDeviation {
                    row,
                    value: record.deviation_percent,
                });
            }

            records.push(record);
        }

        if records.is_empty() {
            return Err(DatasetError::Empty {
                path: path.to_path_buf(),
            });
        }

        debug!(
            "loaded {} report records from {}",
            records.len(),
            path.display()
        );

        Ok(Self {
            records,
            path: path.to_path_buf(),
        })
    }

    /// All report records, in file order.
    pub fn records(&self) -> &[ReportRecord] {
        &self.records
    }

    /// Number of report records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Path the dataset was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Largest deviation present in the dataset.
    pub fn max_deviation(&self) -> f64 {
        self.records
            .iter()
            .map(|r| r.deviation_percent)
            .fold(0.0, f64::max)
    }

    /// Valid threshold range for this dataset: the fixed lower bound up
    /// to the rounded maximum observed deviation.
    pub fn threshold_range(&self) -> ThresholdRange {
        ThresholdRange {
            min: MIN_THRESHOLD,
            max: self.max_deviation().round(),
        }
    }

    /// Distinct cluster ids present in the dataset, sorted.
    pub fn cluster_ids(&self) -> BTreeSet<i64> {
        self.records.iter().map(|r| r.cluster_id).collect()
    }

    /// Number of distinct signers in the dataset.
    pub fn distinct_signers(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.signer_name.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Geographic center of the full dataset.
    pub fn center(&self) -> LatLon {
        // load() rejects empty datasets, so a center always exists.
        map::center_of(&self.records).unwrap_or_default()
    }
}
