//! Classification orchestrator
//!
//! Partitions wells by zone, then for each zone runs spacing analysis, area
//! conversion and both range classifications. Zones run on the rayon pool
//! unless parallelism is disabled; output order never depends on it.

use super::{
    AreaConverter, ClassificationError, ClassificationReport, RangeSet, ZoneClassification,
    ZoneError, ZoneSpacingAnalyzer,
};
use crate::config::ClusterConfig;
use crate::types::{ClassifiedWell, SingleWellPolicy, SpacingResult, VolumeClassification, Well};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Separator between the spacing and volume labels of a combined cluster key
pub const COMBINED_LABEL_SEPARATOR: &str = " & ";

/// Join a spacing label and a volume label into a cluster key.
pub fn combine_labels(spacing_label: &str, volume_label: &str) -> String {
    format!("{spacing_label}{COMBINED_LABEL_SEPARATOR}{volume_label}")
}

/// Spacing + volume classifier. Ranges are read-only once built.
#[derive(Debug, Clone)]
pub struct ClassificationEngine {
    spacing_ranges: RangeSet,
    volume_ranges: RangeSet,
    analyzer: ZoneSpacingAnalyzer,
    parallel_zones: bool,
}

impl ClassificationEngine {
    pub fn new(spacing_ranges: RangeSet, volume_ranges: RangeSet) -> Self {
        Self {
            spacing_ranges,
            volume_ranges,
            analyzer: ZoneSpacingAnalyzer::default(),
            parallel_zones: true,
        }
    }

    /// Build the engine from a loaded configuration.
    ///
    /// # Errors
    /// Any range validation error from the `[spacing]` or `[volume]` sections.
    pub fn from_config(config: &ClusterConfig) -> Result<Self, ClassificationError> {
        Ok(Self::new(config.spacing.range_set()?, config.volume.range_set()?)
            .with_single_well_policy(config.engine.single_well_policy)
            .with_parallel_zones(config.engine.parallel_zones))
    }

    #[must_use]
    pub fn with_single_well_policy(mut self, policy: SingleWellPolicy) -> Self {
        self.analyzer = ZoneSpacingAnalyzer::new(policy);
        self
    }

    #[must_use]
    pub fn with_parallel_zones(mut self, parallel: bool) -> Self {
        self.parallel_zones = parallel;
        self
    }

    pub fn spacing_ranges(&self) -> &RangeSet {
        &self.spacing_ranges
    }

    pub fn volume_ranges(&self) -> &RangeSet {
        &self.volume_ranges
    }

    /// Classify every well, zone by zone.
    ///
    /// Never fails as a whole: a zone that cannot be classified is reported
    /// in the returned report and the remaining zones are unaffected.
    pub fn run(&self, wells: &[Well]) -> ClassificationReport {
        let groups = group_by_zone(wells);
        info!(
            wells = wells.len(),
            zones = groups.len(),
            parallel = self.parallel_zones,
            "Classifying wells"
        );

        let outcomes: Vec<_> = if self.parallel_zones {
            groups
                .into_par_iter()
                .map(|(zone, zone_wells)| self.classify_zone(zone, zone_wells))
                .collect()
        } else {
            groups
                .into_iter()
                .map(|(zone, zone_wells)| self.classify_zone(zone, zone_wells))
                .collect()
        };

        let report = ClassificationReport { outcomes };
        for e in report.errors() {
            warn!(zone = %e.zone, error = %e.source, "Zone classification failed");
        }
        info!(
            classified = report.well_count(),
            failed_zones = report.errors().count(),
            "Classification complete"
        );
        report
    }

    /// Flattened form of [`run`](Self::run): classified wells of the
    /// successful zones, plus one error per failed zone.
    pub fn classify(&self, wells: &[Well]) -> (Vec<ClassifiedWell>, Vec<ZoneError>) {
        self.run(wells).into_parts()
    }

    /// Classify the wells of a single zone.
    ///
    /// # Errors
    /// The first spacing or range failure, attributed to `zone`.
    pub fn classify_zone(
        &self,
        zone: String,
        wells: Vec<Well>,
    ) -> Result<ZoneClassification, ZoneError> {
        let distances = self
            .analyzer
            .compute_nearest_distances(&wells)
            .map_err(|e| ZoneError::new(&zone, e))?;

        let classified = wells
            .into_iter()
            .zip(distances)
            .map(|(well, d)| self.classify_well(well, d))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ZoneError::new(&zone, e))?;

        debug!(zone = %zone, wells = classified.len(), "Zone classified");
        Ok(ZoneClassification {
            zone,
            wells: classified,
        })
    }

    fn classify_well(
        &self,
        well: Well,
        nearest_distance: f64,
    ) -> Result<ClassifiedWell, ClassificationError> {
        let drainage_area_acres = AreaConverter::to_acres(nearest_distance)?;
        let spacing_label = self.spacing_ranges.classify(drainage_area_acres)?.to_string();
        let volume_label = self.volume_ranges.classify(well.cum)?.to_string();
        let combined_label = combine_labels(&spacing_label, &volume_label);

        Ok(ClassifiedWell {
            well,
            spacing: SpacingResult {
                nearest_distance,
                drainage_area_acres,
                spacing_label,
            },
            volume: VolumeClassification { volume_label },
            combined_label,
        })
    }
}

/// One-shot classification with default engine settings.
pub fn classify_wells(
    wells: &[Well],
    spacing_ranges: &RangeSet,
    volume_ranges: &RangeSet,
) -> ClassificationReport {
    ClassificationEngine::new(spacing_ranges.clone(), volume_ranges.clone()).run(wells)
}

/// Partition wells by zone, keeping zones in first-appearance order and
/// wells in input order within each zone.
fn group_by_zone(wells: &[Well]) -> Vec<(String, Vec<Well>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<Well>)> = Vec::new();
    for well in wells {
        let slot = *index.entry(well.zone.as_str()).or_insert_with(|| {
            groups.push((well.zone.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(well.clone());
    }
    groups
}
