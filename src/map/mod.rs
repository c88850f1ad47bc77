//! Map annotation for cluster-selected records.
//!
//! Turns a cluster selection into a renderable map view: a center plus
//! one colored, tooltipped marker per record. Marker colors use the same
//! threshold predicate as the main classifier.

use crate::analysis::is_anomalous;
use crate::format::NumberFormat;
use crate::models::{LatLon, MapAnnotation, MapView, MarkerColor, ReportRecord};

/// Mean position of a set of records.
///
/// Returns `None` for an empty set; callers must fall back to the
/// full-dataset center instead of rendering an undefined location.
pub fn center_of(records: &[ReportRecord]) -> Option<LatLon> {
    if records.is_empty() {
        return None;
    }

    let count = records.len() as f64;
    let latitude = records.iter().map(|r| r.latitude).sum::<f64>() / count;
    let longitude = records.iter().map(|r| r.longitude).sum::<f64>() / count;
    Some(LatLon {
        latitude,
        longitude,
    })
}

/// Build the hover text for one marker.
fn tooltip(record: &ReportRecord, format: &NumberFormat) -> String {
    format!(
        "Penilai: {}\nKJPP: {}\nNilai Tanah: {}",
        record.signer_name,
        record.firm_name,
        format.currency(record.indicated_land_value)
    )
}

/// Annotate the selected records for map rendering.
///
/// The center is the mean position of the selection; `fallback_center`
/// (the full-dataset center) is used when the selection matched nothing.
pub fn annotate(
    selected: &[ReportRecord],
    threshold: f64,
    fallback_center: LatLon,
    format: &NumberFormat,
) -> MapView {
    let center = center_of(selected).unwrap_or(fallback_center);

    let markers = selected
        .iter()
        .map(|record| MapAnnotation {
            position: record.position(),
            color: if is_anomalous(record, threshold) {
                MarkerColor::Anomalous
            } else {
                MarkerColor::Normal
            },
            tooltip: tooltip(record, format),
        })
        .collect();

    MapView { center, markers }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classify;

    fn make_record(deviation: f64, lat: f64, lon: f64, value: f64) -> ReportRecord {
        ReportRecord {
            deviation_percent: deviation,
            signer_name: "Budi Santoso".to_string(),
            firm_name: "KJPP Andalan".to_string(),
            cluster_id: 1,
            latitude: lat,
            longitude: lon,
            indicated_land_value: value,
        }
    }

    #[test]
    fn test_center_is_the_coordinate_mean() {
        let records = vec![
            make_record(120.0, -6.0, 106.0, 1_000_000.0),
            make_record(120.0, -8.0, 108.0, 1_000_000.0),
        ];

        let center = center_of(&records).unwrap();
        assert!((center.latitude - -7.0).abs() < 1e-9);
        assert!((center.longitude - 107.0).abs() < 1e-9);
    }

    #[test]
    fn test_center_of_empty_set_is_none() {
        assert_eq!(center_of(&[]), None);
    }

    #[test]
    fn test_empty_selection_uses_fallback_center() {
        let fallback = LatLon {
            latitude: -6.17,
            longitude: 106.63,
        };
        let view = annotate(&[], 150.0, fallback, &NumberFormat::default());
        assert_eq!(view.center, fallback);
        assert!(view.markers.is_empty());
    }

    #[test]
    fn test_marker_colors_follow_the_threshold() {
        let records = vec![
            make_record(200.0, -6.17, 106.63, 1_000_000.0),
            make_record(150.0, -6.18, 106.64, 1_000_000.0),
            make_record(90.0, -6.19, 106.65, 1_000_000.0),
        ];

        let view = annotate(
            &records,
            150.0,
            LatLon::default(),
            &NumberFormat::default(),
        );
        let colors: Vec<MarkerColor> = view.markers.iter().map(|m| m.color).collect();
        assert_eq!(
            colors,
            vec![
                MarkerColor::Anomalous,
                MarkerColor::Normal,
                MarkerColor::Normal
            ]
        );
    }

    #[test]
    fn test_marker_colors_agree_with_the_classifier() {
        let records = vec![
            make_record(149.9, -6.17, 106.63, 1_000_000.0),
            make_record(150.0, -6.18, 106.64, 1_000_000.0),
            make_record(150.1, -6.19, 106.65, 1_000_000.0),
        ];
        let threshold = 150.0;

        let anomalous = classify(&records, threshold);
        let view = annotate(
            &records,
            threshold,
            LatLon::default(),
            &NumberFormat::default(),
        );

        for (record, marker) in records.iter().zip(&view.markers) {
            let flagged = marker.color == MarkerColor::Anomalous;
            assert_eq!(flagged, anomalous.contains(record));
        }
    }

    #[test]
    fn test_tooltip_carries_signer_firm_and_formatted_value() {
        let records = vec![make_record(200.0, -6.17, 106.63, 2_500_000.5)];
        let view = annotate(
            &records,
            150.0,
            LatLon::default(),
            &NumberFormat::default(),
        );

        assert_eq!(
            view.markers[0].tooltip,
            "Penilai: Budi Santoso\nKJPP: KJPP Andalan\nNilai Tanah: Rp2.500.000,50"
        );
    }
}
