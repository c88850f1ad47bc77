//! Data models for the appraisal risk engine.
//!
//! This module contains all the core data structures used throughout
//! the application for representing report records, appraiser summaries,
//! and map annotations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single valuation report row from the input dataset.
///
/// Rows are immutable after load. The serde renames match the dataset's
/// column headers exactly; a missing column is a fatal load error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportRecord {
    /// Percent standard deviation of the appraised value vs. the baseline.
    /// Always non-negative.
    #[serde(rename = "% Std Dev")]
    pub deviation_percent: f64,
    /// Name of the appraiser who signed the report.
    #[serde(rename = "Penanda Tangan")]
    pub signer_name: String,
    /// Valuation firm (KJPP) the report was issued under. A signer may
    /// appear under different firms across reports.
    #[serde(rename = "KJPP")]
    pub firm_name: String,
    /// Geographic cluster of the appraised property.
    #[serde(rename = "Cluster No.")]
    pub cluster_id: i64,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    /// Indicated land value in rupiah.
    #[serde(rename = "Indikasi Nilai Tanah")]
    pub indicated_land_value: f64,
}

impl ReportRecord {
    /// Returns the record's position as a coordinate pair.
    pub fn position(&self) -> LatLon {
        LatLon {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// A geographic coordinate pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

/// Classification of a map marker against the current threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    /// Deviation strictly above the threshold
    Anomalous,
    /// Deviation at or below the threshold
    Normal,
}

impl fmt::Display for MarkerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerColor::Anomalous => write!(f, "anomalous"),
            MarkerColor::Normal => write!(f, "normal"),
        }
    }
}

impl MarkerColor {
    /// Returns an emoji representation of the marker tint.
    pub fn emoji(&self) -> &'static str {
        match self {
            MarkerColor::Anomalous => "🔴",
            MarkerColor::Normal => "🔵",
        }
    }
}

/// The valid deviation-threshold range for a loaded dataset.
///
/// The lower bound is fixed; the upper bound is the rounded maximum
/// deviation observed in the data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdRange {
    pub min: f64,
    pub max: f64,
}

impl ThresholdRange {
    /// Whether a threshold lies within the inclusive range.
    pub fn contains(&self, threshold: f64) -> bool {
        threshold >= self.min && threshold <= self.max
    }
}

impl fmt::Display for ThresholdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Summary row for one appraiser appearing in the anomalous subset.
///
/// Recomputed in full on every run; a pure function of (dataset, threshold).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppraiserSummary {
    /// 1-based position in first-appearance order within the anomalous subset.
    pub rank: usize,
    /// Name of the appraiser.
    pub appraiser_name: String,
    /// Distinct firms among the appraiser's anomalous reports, joined for display.
    pub firms: String,
    /// Reports signed by this appraiser across the whole dataset.
    pub total_reports: usize,
    /// Reports signed by this appraiser in the anomalous subset.
    pub anomaly_reports: usize,
    /// Share of the appraiser's reports that are anomalous, rounded to whole percent.
    pub anomaly_percent: u32,
    /// Distinct clusters among the appraiser's anomalous reports, joined for display.
    pub clusters: String,
}

/// One rendered map marker for a cluster-selected report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapAnnotation {
    /// Marker position.
    pub position: LatLon,
    /// Classification against the current threshold.
    pub color: MarkerColor,
    /// Hover text: signer, firm, and the formatted land value.
    pub tooltip: String,
}

/// The rendered map: a center plus one marker per selected record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    /// Mean position of the selected records, or the dataset-wide center
    /// when the selection matched nothing.
    pub center: LatLon,
    /// One marker per selected record, in dataset order.
    pub markers: Vec<MapAnnotation>,
}

/// Headline counts for one threshold run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AnalysisSummary {
    /// Reports whose deviation strictly exceeds the threshold.
    pub anomalous_reports: usize,
    /// Distinct appraisers signing those reports.
    pub anomalous_appraisers: usize,
}

/// Metadata about a risk-engine run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Path of the analyzed dataset.
    pub dataset_path: String,
    /// Date and time of the analysis.
    pub analysis_date: DateTime<Utc>,
    /// Deviation threshold the run was executed with.
    pub threshold: f64,
    /// Total number of report records in the dataset.
    pub records_total: usize,
    /// Maximum deviation observed in the dataset.
    pub max_deviation: f64,
}

/// The complete output of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    /// Metadata about the run.
    pub metadata: ReportMetadata,
    /// Headline anomaly counts.
    pub summary: AnalysisSummary,
    /// One summary row per anomalous appraiser, in first-appearance order.
    pub appraisers: Vec<AppraiserSummary>,
    /// Map markers for the cluster selection. Absent when no selection
    /// was active (the map then shows only the dataset-wide center).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<MapView>,
    /// Center of the full dataset.
    pub default_center: LatLon,
}
