//! Well-Cluster: Spacing and Volume Clustering for Workover Candidate Selection
//!
//! Classifies wells per geological zone into joint spacing/volume clusters.
//!
//! ## Architecture
//!
//! - **Classification Engine**: nearest-neighbour spacing, drainage-area
//!   conversion, range bucketing and combined cluster labels
//! - **Dataset**: CSV ingestion of the well table
//! - **Export**: per-zone CSV export and JSON run summaries
//! - **Config**: operator-tunable TOML configuration

pub mod config;
pub mod types;
pub mod classification;
pub mod dataset;
pub mod export;

// Re-export configuration
pub use config::ClusterConfig;

// Re-export commonly used types
pub use types::{ClassifiedWell, SingleWellPolicy, SpacingResult, VolumeClassification, Well};

// Re-export the classification engine
pub use classification::{
    classify_wells, AreaConverter, ClassificationEngine, ClassificationError,
    ClassificationReport, Interval, RangeSet, RunSummary, SpatialIndex, ZoneClassification,
    ZoneError, ZoneSpacingAnalyzer,
};

// Re-export I/O
pub use dataset::{DatasetError, Delimiter, WellTable};
pub use export::{ClusterExporter, ExportError};
