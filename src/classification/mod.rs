//! Classification Engine for Well Spacing / Volume Clusters
//!
//! Buckets every well of a zone by two independent metrics and joins the two
//! bucket labels into one cluster key.
//!
//! ## Pipeline (per zone)
//! 1. `spacing`: nearest-neighbour distance via a 2D k-d tree (`spatial_index`)
//! 2. `area`: distance → equivalent circular drainage area (acres)
//! 3. `range_set`: drainage area → spacing label, cumulative volume → volume label
//! 4. `engine`: `spacing_label & volume_label`
//!
//! Zones never share mutable state, so a failure in one zone is reported
//! against that zone while the others still complete (`report`).

pub mod area;
pub mod range_set;
pub mod spatial_index;
pub mod spacing;
pub mod engine;
pub mod report;

pub use area::{AreaConverter, SQUARE_METRES_PER_ACRE};
pub use engine::{classify_wells, combine_labels, ClassificationEngine, COMBINED_LABEL_SEPARATOR};
pub use range_set::{Interval, RangeSet};
pub use report::{ClassificationReport, ClusterSummary, RunSummary, ZoneClassification, ZoneFailure, ZoneSummary};
pub use spacing::ZoneSpacingAnalyzer;
pub use spatial_index::SpatialIndex;

use thiserror::Error;

/// Errors raised while building ranges or classifying a zone
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassificationError {
    #[error("Range set must contain at least one interval")]
    EmptyRangeSet,

    #[error("Invalid interval #{index}: lower bound ({lower}) must be below upper bound ({upper})")]
    InvalidInterval { index: usize, lower: f64, upper: f64 },

    #[error("Overlapping ranges at #{index}: upper bound {upper} is above the next lower bound {next_lower}")]
    OverlappingRanges { index: usize, upper: f64, next_lower: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot classify value {value} into {unit} ranges")]
    Unclassifiable { unit: String, value: f64 },

    #[error("Well {well_id} has non-finite coordinates ({x}, {y})")]
    NonFiniteCoordinate { well_id: String, x: f64, y: f64 },

    #[error("Insufficient neighbors: zone has {wells} well(s), need at least 2")]
    InsufficientNeighbors { wells: usize },
}

/// A classification failure attributed to the zone it happened in.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Zone '{zone}': {source}")]
pub struct ZoneError {
    pub zone: String,
    #[source]
    pub source: ClassificationError,
}

impl ZoneError {
    pub fn new(zone: &str, source: ClassificationError) -> Self {
        Self {
            zone: zone.to_string(),
            source,
        }
    }
}
