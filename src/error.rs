//! Typed errors for the risk-engine pipeline.
//!
//! Dataset problems are fatal at startup; cluster-input problems are
//! recoverable at the CLI boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the report dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be opened or read.
    #[error("failed to open dataset {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row could not be parsed into a report record, including rows
    /// with missing or mistyped columns.
    #[error("malformed dataset row {row}")]
    Malformed {
        /// 1-based line number in the file (the header is line 1).
        row: usize,
        #[source]
        source: csv::Error,
    },

    /// A row carries a negative deviation, which the pipeline never produces.
    #[error("dataset row {row} has a negative deviation ({value})")]
    NegativeDeviation { row: usize, value: f64 },

    /// The file parsed but contains no report rows.
    #[error("dataset {path} contains no report rows")]
    Empty { path: PathBuf },
}

/// Errors raised while parsing the cluster-selection input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// A token in the comma-separated cluster input is not an integer.
    /// The whole selection is rejected; no partial filtering happens.
    #[error("invalid cluster number {token:?} (expected an integer)")]
    InvalidClusterId { token: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_error_message_names_token() {
        let err = SelectionError::InvalidClusterId {
            token: "a".to_string(),
        };
        assert!(err.to_string().contains("\"a\""));
        assert!(err.to_string().contains("integer"));
    }

    #[test]
    fn test_dataset_error_messages() {
        let err = DatasetError::NegativeDeviation {
            row: 12,
            value: -3.5,
        };
        assert!(err.to_string().contains("row 12"));
        assert!(err.to_string().contains("-3.5"));

        let err = DatasetError::Empty {
            path: PathBuf::from("reports.csv"),
        };
        assert!(err.to_string().contains("reports.csv"));
    }
}
