//! Classification Integration Tests
//!
//! Drive the full path a caller takes: CSV well table → engine → per-zone
//! lookups → export, using only the public API.

use std::collections::HashSet;
use well_cluster::config::ClusterConfig;
use well_cluster::{
    classify_wells, ClassificationEngine, ClassificationError, ClusterExporter, RangeSet,
    SingleWellPolicy, Well, WellTable,
};

const INF: f64 = f64::INFINITY;

/// Semicolon-separated table with two zones and a lone well in a third.
const FIELD_CSV: &str = "\
Well;Zone Name;X;Y;Cum
P-01;Upper Sand;0;0;3
P-02;Upper Sand;100;0;6
P-03;Upper Sand;0;100;12
P-04;Upper Sand;100;100;1
P-05;Lower Sand;0;0;4
P-06;Lower Sand;250;0;5.1
P-07;Lower Sand;600;0;20
P-08;Deep;50;50;11
";

fn field_config() -> ClusterConfig {
    let mut config = ClusterConfig::default();
    config.input.id_column = Some("Well".to_string());
    config.spacing.ranges = vec![[-INF, 4.0], [4.0, INF]];
    config.volume.ranges = vec![[-INF, 5.0], [5.0, 10.0], [10.0, INF]];
    config
}

fn field_run() -> (WellTable, well_cluster::ClassificationReport) {
    let config = field_config();
    let table = WellTable::parse(FIELD_CSV, &config.input).expect("valid table");
    let engine = ClassificationEngine::from_config(&config).expect("valid ranges");
    let report = engine.run(&table.wells);
    (table, report)
}

#[test]
fn grid_zone_labels_match_expected_concatenation() {
    let (_, report) = field_run();
    let upper = report.zone("Upper Sand").expect("Upper Sand classified");
    let labels: Vec<(&str, &str)> = upper
        .wells
        .iter()
        .map(|w| (w.well.id.as_str(), w.combined_label.as_str()))
        .collect();
    assert_eq!(
        labels,
        vec![
            ("P-01", "less than 4 acres & less than 5 MSTB"),
            ("P-02", "less than 4 acres & between 5 MSTB and 10 MSTB"),
            ("P-03", "less than 4 acres & greater than 10 MSTB"),
            ("P-04", "less than 4 acres & less than 5 MSTB"),
        ]
    );
}

#[test]
fn zones_are_classified_independently() {
    let (_, report) = field_run();
    assert_eq!(report.zone_names(), vec!["Upper Sand", "Lower Sand", "Deep"]);

    // Lower Sand: 250 m apart (~12.1 acres) and 350 m apart (~23.8 acres)
    let lower = report.zone("Lower Sand").expect("Lower Sand classified");
    let nearest: Vec<f64> = lower.wells.iter().map(|w| w.spacing.nearest_distance).collect();
    assert_eq!(nearest, vec![250.0, 250.0, 350.0]);
    assert!(lower.wells.iter().all(|w| w.spacing_label() == "greater than 4 acres"));

    // Deep: a lone well is unbounded and lands in the top spacing bucket
    let deep = report.zone("Deep").expect("Deep classified");
    assert_eq!(deep.wells[0].spacing.nearest_distance, INF);
    assert_eq!(deep.wells[0].combined_label, "greater than 4 acres & greater than 10 MSTB");
}

#[test]
fn every_well_appears_exactly_once() {
    let (table, report) = field_run();
    assert_eq!(report.well_count(), table.wells.len());
    let ids: HashSet<&str> = report.wells().map(|w| w.well.id.as_str()).collect();
    assert_eq!(ids.len(), table.wells.len());
}

#[test]
fn cluster_filter_returns_matching_rows() {
    let (_, report) = field_run();
    let upper = report.zone("Upper Sand").expect("Upper Sand classified");
    assert_eq!(upper.clusters().len(), 3);
    let low: Vec<&str> = upper
        .cluster("less than 4 acres & less than 5 MSTB")
        .map(|w| w.well.id.as_str())
        .collect();
    assert_eq!(low, vec!["P-01", "P-04"]);
}

#[test]
fn reject_policy_isolates_single_well_zone() {
    let config = field_config();
    let table = WellTable::parse(FIELD_CSV, &config.input).expect("valid table");
    let engine = ClassificationEngine::from_config(&config)
        .expect("valid ranges")
        .with_single_well_policy(SingleWellPolicy::Reject);
    let report = engine.run(&table.wells);
    assert_eq!(report.well_count(), 7);
    let err = report.errors().next().expect("Deep must fail");
    assert_eq!(err.zone, "Deep");
    assert_eq!(err.source, ClassificationError::InsufficientNeighbors { wells: 1 });
}

#[test]
fn runs_are_idempotent() {
    let (table, first) = field_run();
    let spacing = RangeSet::new([(-INF, 4.0), (4.0, INF)], "acres").expect("valid");
    let volume = RangeSet::new([(-INF, 5.0), (5.0, 10.0), (10.0, INF)], "MSTB").expect("valid");
    let second = classify_wells(&table.wells, &spacing, &volume);
    let third = classify_wells(&table.wells, &spacing, &volume);
    assert_eq!(first, second);
    assert_eq!(second, third);
}

#[test]
fn default_ranges_classify_field_table() {
    let config = ClusterConfig::default();
    let table = WellTable::parse(FIELD_CSV, &config.input).expect("valid table");
    let report = ClassificationEngine::from_config(&config)
        .expect("defaults")
        .run(&table.wells);
    assert!(report.is_complete());
    // Row numbers become ids when no id column is configured
    let first = report.wells().next().expect("at least one well");
    assert_eq!(first.well.id, "1");
    // 5.1 sits exactly on the lower bound of the default middle volume range
    let p06 = report
        .wells()
        .find(|w| w.well.record[0] == "P-06")
        .expect("P-06 present");
    assert_eq!(p06.volume_label(), "between 5.1 MSTB and 10.1 MSTB");
}

#[test]
fn export_round_trips_through_csv() {
    let (table, report) = field_run();
    let dir = tempfile::tempdir().expect("tempdir");
    let exporter = ClusterExporter::new(dir.path(), "_clusters.csv");
    let paths = exporter
        .export_report(&table.columns, &report)
        .expect("export");
    assert_eq!(paths.len(), 3);

    let mut reload_config = ClusterConfig::default();
    reload_config.input.id_column = Some("Well".to_string());
    let reloaded = WellTable::load(&dir.path().join("Upper Sand_clusters.csv"), &reload_config.input)
        .expect("exported file is a valid well table");
    assert_eq!(reloaded.delimiter, ',');
    assert_eq!(reloaded.columns.last().map(String::as_str), Some("combined_group"));
    assert_eq!(reloaded.wells.len(), 4);
    let combined = reloaded.wells[1].record.last().expect("combined column");
    assert_eq!(combined, "less than 4 acres & between 5 MSTB and 10 MSTB");
}

#[test]
fn nan_volume_is_reported_against_its_zone() {
    let wells = vec![
        Well::new("a", "Z1", 0.0, 0.0, 1.0),
        Well::new("b", "Z1", 10.0, 0.0, 2.0),
        Well::new("c", "Z2", 0.0, 0.0, f64::NAN),
        Well::new("d", "Z2", 10.0, 0.0, 2.0),
    ];
    let spacing = RangeSet::new([(-INF, 4.0), (4.0, INF)], "acres").expect("valid");
    let volume = RangeSet::new([(-INF, 5.0), (5.0, INF)], "MSTB").expect("valid");
    let report = classify_wells(&wells, &spacing, &volume);
    assert!(report.zone("Z1").is_some());
    assert!(report.zone("Z2").is_none());
    assert_eq!(report.errors().map(|e| e.zone.as_str()).collect::<Vec<_>>(), vec!["Z2"]);
}
