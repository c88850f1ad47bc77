//! Markdown and JSON report generation.
//!
//! This module renders the results of a pipeline run — headline counts,
//! the appraiser table, and the map annotations — into report files.

use crate::config::ReportConfig;
use crate::models::{AppraiserSummary, LatLon, MapView, ReportMetadata, RiskReport};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &RiskReport, options: &ReportConfig) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Apprisk Report\n\n");

    // Metadata section
    output.push_str(&generate_metadata_section(&report.metadata));

    // Headline summary
    output.push_str(&generate_summary_section(report));

    // Appraiser table
    output.push_str(&generate_appraiser_section(
        &report.appraisers,
        options.max_table_rows,
    ));

    // Map section
    if options.include_map {
        output.push_str(&generate_map_section(
            report.map.as_ref(),
            report.default_center,
        ));
    }

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.dataset_path));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Threshold:** {}\n", metadata.threshold));
    section.push_str(&format!("- **Total Reports:** {}\n", metadata.records_total));
    section.push_str(&format!(
        "- **Max Deviation:** {:.2}\n",
        metadata.max_deviation
    ));
    section.push('\n');

    section
}

/// Generate the headline summary section.
fn generate_summary_section(report: &RiskReport) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str(&format!(
        "Analysis results for a {} threshold:\n\n",
        report.metadata.threshold
    ));
    section.push_str(&format!(
        "- **{}** anomalies found in property reports.\n",
        report.summary.anomalous_reports
    ));
    section.push_str(&format!(
        "- **{}** anomaly appraisers are identified.\n",
        report.summary.anomalous_appraisers
    ));
    section.push('\n');

    section
}

/// Generate the anomaly-appraiser table.
fn generate_appraiser_section(appraisers: &[AppraiserSummary], max_rows: usize) -> String {
    let mut section = String::new();

    section.push_str("## Anomaly Appraisers\n\n");

    if appraisers.is_empty() {
        section.push_str("No reports deviate above this threshold.\n\n");
        return section;
    }

    let shown = if max_rows > 0 && appraisers.len() > max_rows {
        &appraisers[..max_rows]
    } else {
        appraisers
    };

    section.push_str(
        "| No. | Appraiser Names | Valuation Firms | Total Reports | Anomaly Reports | Percent Anomaly | Clusters |\n",
    );
    section.push_str("|:---:|:---|:---|:---:|:---:|:---:|:---|\n");

    for row in shown {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            row.rank,
            row.appraiser_name,
            row.firms,
            row.total_reports,
            row.anomaly_reports,
            row.anomaly_percent,
            row.clusters
        ));
    }
    section.push('\n');

    if shown.len() < appraisers.len() {
        section.push_str(&format!(
            "*… plus {} more appraisers.*\n\n",
            appraisers.len() - shown.len()
        ));
    }

    section
}

/// Generate the map section.
fn generate_map_section(map: Option<&MapView>, default_center: LatLon) -> String {
    let mut section = String::new();

    section.push_str("## Property Map\n\n");

    let Some(view) = map else {
        section.push_str(&format!(
            "No clusters selected; the map centers on the full dataset at {}.\n\n",
            format_position(default_center)
        ));
        return section;
    };

    section.push_str(&format!(
        "- **Center:** {}\n\n",
        format_position(view.center)
    ));

    if view.markers.is_empty() {
        section.push_str("No properties in the selected clusters.\n\n");
        return section;
    }

    section.push_str("| No. | Marker | Position | Details |\n");
    section.push_str("|:---:|:---:|:---|:---|\n");

    for (i, marker) in view.markers.iter().enumerate() {
        section.push_str(&format!(
            "| {} | {} {} | {} | {} |\n",
            i + 1,
            marker.color.emoji(),
            marker.color,
            format_position(marker.position),
            marker.tooltip.replace('\n', "<br>")
        ));
    }
    section.push('\n');

    section
}

/// Render a coordinate pair for display.
fn format_position(position: LatLon) -> String {
    format!("{:.5}, {:.5}", position.latitude, position.longitude)
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by apprisk*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &RiskReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AnalysisSummary, MapAnnotation, MarkerColor, ReportMetadata, RiskReport,
    };
    use chrono::Utc;

    fn make_summary(rank: usize, name: &str) -> AppraiserSummary {
        AppraiserSummary {
            rank,
            appraiser_name: name.to_string(),
            firms: "KJPP Andalan".to_string(),
            total_reports: 4,
            anomaly_reports: 2,
            anomaly_percent: 50,
            clusters: "1, 3".to_string(),
        }
    }

    fn make_report() -> RiskReport {
        RiskReport {
            metadata: ReportMetadata {
                dataset_path: "df_risk_engine.csv".to_string(),
                analysis_date: Utc::now(),
                threshold: 150.0,
                records_total: 40,
                max_deviation: 436.7,
            },
            summary: AnalysisSummary {
                anomalous_reports: 6,
                anomalous_appraisers: 2,
            },
            appraisers: vec![make_summary(1, "Budi Santoso"), make_summary(2, "Citra Dewi")],
            map: Some(MapView {
                center: LatLon {
                    latitude: -6.17,
                    longitude: 106.63,
                },
                markers: vec![MapAnnotation {
                    position: LatLon {
                        latitude: -6.17,
                        longitude: 106.63,
                    },
                    color: MarkerColor::Anomalous,
                    tooltip: "Penilai: Budi Santoso\nKJPP: KJPP Andalan\nNilai Tanah: Rp2.500.000,00"
                        .to_string(),
                }],
            }),
            default_center: LatLon {
                latitude: -6.18,
                longitude: 106.64,
            },
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = make_report();
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("# Apprisk Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Summary"));
        assert!(markdown.contains("**6** anomalies found in property reports."));
        assert!(markdown.contains("**2** anomaly appraisers are identified."));
        assert!(markdown.contains("## Anomaly Appraisers"));
        assert!(markdown.contains("| 1 | Budi Santoso | KJPP Andalan | 4 | 2 | 50 | 1, 3 |"));
        assert!(markdown.contains("## Property Map"));
        assert!(markdown.contains("🔴 anomalous"));
        assert!(markdown.contains("Penilai: Budi Santoso<br>KJPP: KJPP Andalan"));
    }

    #[test]
    fn test_no_selection_renders_default_center() {
        let mut report = make_report();
        report.map = None;

        let markdown = generate_markdown_report(&report, &ReportConfig::default());
        assert!(markdown.contains("No clusters selected"));
        assert!(markdown.contains("-6.18000, 106.64000"));
        assert!(!markdown.contains("| No. | Marker |"));
    }

    #[test]
    fn test_empty_selection_renders_fallback_center_without_markers() {
        let mut report = make_report();
        report.map = Some(MapView {
            center: report.default_center,
            markers: Vec::new(),
        });

        let markdown = generate_markdown_report(&report, &ReportConfig::default());
        assert!(markdown.contains("No properties in the selected clusters."));
    }

    #[test]
    fn test_empty_appraiser_table() {
        let mut report = make_report();
        report.appraisers.clear();
        report.summary = AnalysisSummary::default();

        let markdown = generate_markdown_report(&report, &ReportConfig::default());
        assert!(markdown.contains("No reports deviate above this threshold."));
    }

    #[test]
    fn test_table_rows_can_be_capped() {
        let report = make_report();
        let options = ReportConfig {
            include_map: true,
            max_table_rows: 1,
        };

        let markdown = generate_markdown_report(&report, &options);
        assert!(markdown.contains("Budi Santoso"));
        assert!(!markdown.contains("| 2 | Citra Dewi"));
        assert!(markdown.contains("plus 1 more appraisers"));
    }

    #[test]
    fn test_map_section_can_be_disabled() {
        let report = make_report();
        let options = ReportConfig {
            include_map: false,
            max_table_rows: 0,
        };

        let markdown = generate_markdown_report(&report, &options);
        assert!(!markdown.contains("## Property Map"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = make_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"dataset_path\""));
        assert!(json.contains("\"appraisers\""));
        assert!(json.contains("\"anomalous_reports\": 6"));
        assert!(json.contains("\"color\": \"anomalous\""));
    }

    #[test]
    fn test_json_report_omits_absent_map() {
        let mut report = make_report();
        report.map = None;

        let json = generate_json_report(&report).unwrap();
        assert!(!json.contains("\"map\""));
        assert!(json.contains("\"default_center\""));
    }
}
