//! Classification results, grouped by zone.
//!
//! A run yields one outcome per zone, in the order each zone first appears in
//! the input. Failed zones keep their error so the caller can report it
//! against the zone name.

use super::ZoneError;
use crate::types::ClassifiedWell;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every classified well of one zone, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneClassification {
    pub zone: String,
    pub wells: Vec<ClassifiedWell>,
}

impl ZoneClassification {
    pub fn len(&self) -> usize {
        self.wells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wells.is_empty()
    }

    /// Distinct combined labels, in order of first appearance.
    pub fn clusters(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for w in &self.wells {
            if !seen.contains(&w.combined_label.as_str()) {
                seen.push(&w.combined_label);
            }
        }
        seen
    }

    /// Wells whose combined label equals `label`.
    pub fn cluster<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a ClassifiedWell> + 'a {
        self.wells.iter().filter(move |w| w.combined_label == label)
    }

    /// `(label, well count)` per cluster, in order of first appearance.
    pub fn cluster_counts(&self) -> Vec<(&str, usize)> {
        self.clusters()
            .into_iter()
            .map(|label| (label, self.cluster(label).count()))
            .collect()
    }
}

/// Outcome of one classification run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassificationReport {
    pub outcomes: Vec<Result<ZoneClassification, ZoneError>>,
}

impl ClassificationReport {
    /// Successfully classified zones.
    pub fn zones(&self) -> impl Iterator<Item = &ZoneClassification> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    /// Zone-attributed failures.
    pub fn errors(&self) -> impl Iterator<Item = &ZoneError> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    /// Look up a successfully classified zone by name.
    pub fn zone(&self, name: &str) -> Option<&ZoneClassification> {
        self.zones().find(|z| z.zone == name)
    }

    /// Names of every zone in the run, failed or not.
    pub fn zone_names(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .map(|o| match o {
                Ok(z) => z.zone.as_str(),
                Err(e) => e.zone.as_str(),
            })
            .collect()
    }

    /// All classified wells of all successful zones.
    pub fn wells(&self) -> impl Iterator<Item = &ClassifiedWell> {
        self.zones().flat_map(|z| z.wells.iter())
    }

    pub fn well_count(&self) -> usize {
        self.zones().map(ZoneClassification::len).sum()
    }

    /// True when no zone failed.
    pub fn is_complete(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Split into the wells of successful zones and the zone failures.
    pub fn into_parts(self) -> (Vec<ClassifiedWell>, Vec<ZoneError>) {
        let mut wells = Vec::new();
        let mut errors = Vec::new();
        for outcome in self.outcomes {
            match outcome {
                Ok(zone) => wells.extend(zone.wells),
                Err(e) => errors.push(e),
            }
        }
        (wells, errors)
    }

    /// Serializable overview of the run.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            generated_at: Utc::now(),
            total_wells: self.well_count(),
            zones: self
                .zones()
                .map(|z| ZoneSummary {
                    zone: z.zone.clone(),
                    wells: z.len(),
                    clusters: z
                        .cluster_counts()
                        .into_iter()
                        .map(|(label, wells)| ClusterSummary {
                            label: label.to_string(),
                            wells,
                        })
                        .collect(),
                })
                .collect(),
            failures: self
                .errors()
                .map(|e| ZoneFailure {
                    zone: e.zone.clone(),
                    error: e.source.to_string(),
                })
                .collect(),
        }
    }
}

/// JSON-friendly run overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub total_wells: usize,
    pub zones: Vec<ZoneSummary>,
    pub failures: Vec<ZoneFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub zone: String,
    pub wells: usize,
    pub clusters: Vec<ClusterSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub label: String,
    pub wells: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneFailure {
    pub zone: String,
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::ClassificationError;
    use crate::types::{SpacingResult, VolumeClassification, Well};

    fn classified(id: &str, zone: &str, label: &str) -> ClassifiedWell {
        let (spacing_label, volume_label) = label.split_once(" & ").unwrap_or((label, ""));
        ClassifiedWell {
            well: Well::new(id, zone, 0.0, 0.0, 1.0),
            spacing: SpacingResult {
                nearest_distance: 1.0,
                drainage_area_acres: 1.0,
                spacing_label: spacing_label.to_string(),
            },
            volume: VolumeClassification {
                volume_label: volume_label.to_string(),
            },
            combined_label: label.to_string(),
        }
    }

    fn sample_report() -> ClassificationReport {
        ClassificationReport {
            outcomes: vec![
                Ok(ZoneClassification {
                    zone: "A".to_string(),
                    wells: vec![
                        classified("1", "A", "s2 & v1"),
                        classified("2", "A", "s1 & v1"),
                        classified("3", "A", "s2 & v1"),
                    ],
                }),
                Err(ZoneError::new("B", ClassificationError::InsufficientNeighbors { wells: 1 })),
                Ok(ZoneClassification {
                    zone: "C".to_string(),
                    wells: vec![classified("4", "C", "s1 & v2")],
                }),
            ],
        }
    }

    #[test]
    fn test_clusters_in_first_appearance_order() {
        let report = sample_report();
        let a = report.zone("A").expect("zone A");
        assert_eq!(a.clusters(), vec!["s2 & v1", "s1 & v1"]);
        assert_eq!(a.cluster_counts(), vec![("s2 & v1", 2), ("s1 & v1", 1)]);
        let ids: Vec<&str> = a.cluster("s2 & v1").map(|w| w.well.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(a.cluster("nope").count(), 0);
    }

    #[test]
    fn test_report_lookups() {
        let report = sample_report();
        assert_eq!(report.zone_names(), vec!["A", "B", "C"]);
        assert!(report.zone("B").is_none());
        assert_eq!(report.well_count(), 4);
        assert_eq!(report.wells().count(), 4);
        assert!(!report.is_complete());
        assert_eq!(report.errors().count(), 1);
    }

    #[test]
    fn test_summary_serializes() {
        let summary = sample_report().summary();
        assert_eq!(summary.total_wells, 4);
        assert_eq!(summary.zones.len(), 2);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].zone, "B");
        let json = serde_json::to_string(&summary).expect("serializable");
        assert!(json.contains("\"s2 & v1\""));
        assert!(json.contains("Insufficient neighbors"));
    }
}
