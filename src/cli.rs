//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

use crate::dataset::MIN_THRESHOLD;

/// Apprisk - appraisal anomaly detector for valuation report datasets
///
/// Flags valuation reports whose value opinion deviates abnormally from
/// the statistical baseline, summarizes which appraisers produce them,
/// and annotates the affected properties for map rendering.
///
/// Examples:
///   apprisk --data df_risk_engine.csv --threshold 150
///   apprisk --data df_risk_engine.csv --threshold 150 --clusters "2,4"
///   apprisk --data df_risk_engine.csv --format json --output report.json
///   apprisk --data df_risk_engine.csv --dry-run
///   apprisk --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the report dataset CSV
    ///
    /// Required columns: "% Std Dev", "Penanda Tangan", "KJPP",
    /// "Cluster No.", "Latitude", "Longitude", "Indikasi Nilai Tanah".
    /// Can also be set via APPRISK_DATA or .apprisk.toml.
    #[arg(short, long, value_name = "FILE", env = "APPRISK_DATA")]
    pub data: Option<PathBuf>,

    /// Deviation threshold in percent standard deviation
    ///
    /// Reports deviating strictly above this value are flagged as
    /// anomalous. Must lie between 100 and the maximum deviation
    /// observed in the dataset.
    #[arg(short, long, default_value_t = MIN_THRESHOLD, value_name = "PERCENT")]
    pub threshold: f64,

    /// Cluster numbers to display on the map (comma-separated)
    ///
    /// Example: --clusters "2,4". When omitted, the map section shows
    /// only the dataset-wide center without per-property markers.
    #[arg(long, value_name = "LIST")]
    pub clusters: Option<String>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .apprisk.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: load and validate the dataset, print its statistics,
    /// and exit without writing a report
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .apprisk.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    ///
    /// The threshold's upper bound depends on the dataset, so only the
    /// fixed lower bound is checked here.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if !self.threshold.is_finite() {
            return Err("Threshold must be a finite number".to_string());
        }

        if self.threshold < MIN_THRESHOLD {
            return Err(format!("Threshold must be at least {}", MIN_THRESHOLD));
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate the dataset path if provided
        if let Some(ref data_path) = self.data {
            if !data_path.exists() {
                return Err(format!(
                    "Dataset file does not exist: {}",
                    data_path.display()
                ));
            }
            if !data_path.is_file() {
                return Err(format!(
                    "Dataset path is not a file: {}",
                    data_path.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// The raw cluster-selection text, blank when the flag was omitted.
    pub fn cluster_input(&self) -> &str {
        self.clusters.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            data: None,
            threshold: 150.0,
            clusters: None,
            output: None,
            format: OutputFormat::Markdown,
            config: None,
            verbose: false,
            quiet: false,
            dry_run: false,
            init_config: false,
        }
    }

    #[test]
    fn test_validation_accepts_defaults() {
        let args = make_args();
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_threshold_below_floor() {
        let mut args = make_args();
        args.threshold = 99.0;
        assert!(args.validate().is_err());

        args.threshold = 100.0;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_non_finite_threshold() {
        let mut args = make_args();
        args.threshold = f64::NAN;
        assert!(args.validate().is_err());

        args.threshold = f64::INFINITY;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_dataset_file() {
        let mut args = make_args();
        args.data = Some(PathBuf::from("no_such_dataset.csv"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_init_config_skips_validation() {
        let mut args = make_args();
        args.threshold = 10.0;
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_cluster_input_defaults_to_blank() {
        let mut args = make_args();
        assert_eq!(args.cluster_input(), "");

        args.clusters = Some("2,4".to_string());
        assert_eq!(args.cluster_input(), "2,4");
    }
}
