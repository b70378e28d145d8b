//! Shared data structures for well spacing and volume clustering
//!
//! This module defines the records that flow through the classifier:
//! - Input: `Well` (one row of the well table)
//! - Derived: `SpacingResult`, `VolumeClassification`
//! - Output: `ClassifiedWell` (input row plus every derived value)

use serde::{Deserialize, Serialize};

// ============================================================================
// Input Records
// ============================================================================

/// A single well as read from the input table. Never mutated after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Well {
    /// Well identifier (id column value, or the 1-based data row number)
    pub id: String,
    /// Geological zone the well is completed in
    pub zone: String,
    /// Planar X coordinate (metres)
    pub x: f64,
    /// Planar Y coordinate (metres)
    pub y: f64,
    /// Cumulative production volume
    pub cum: f64,
    /// Raw input row, in input column order (empty when built in code)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub record: Vec<String>,
}

impl Well {
    pub fn new(id: impl Into<String>, zone: impl Into<String>, x: f64, y: f64, cum: f64) -> Self {
        Self {
            id: id.into(),
            zone: zone.into(),
            x,
            y,
            cum,
            record: Vec::new(),
        }
    }

    /// Attach the raw input row this well was parsed from.
    pub fn with_record(mut self, record: Vec<String>) -> Self {
        self.record = record;
        self
    }
}

// ============================================================================
// Single-Well Zones
// ============================================================================

/// What to do with a zone that contains only one well (no neighbour exists).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingleWellPolicy {
    /// Assign an infinite nearest distance; the well lands in the top spacing bucket
    #[default]
    Unbounded,
    /// Fail the zone with `InsufficientNeighbors`
    Reject,
}

impl std::fmt::Display for SingleWellPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SingleWellPolicy::Unbounded => write!(f, "unbounded"),
            SingleWellPolicy::Reject => write!(f, "reject"),
        }
    }
}

// ============================================================================
// Derived Values
// ============================================================================

/// Spacing metrics derived from the nearest neighbour in the same zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingResult {
    /// Distance to the closest other well in the zone (+inf when alone)
    pub nearest_distance: f64,
    /// Equivalent circular drainage area in acres
    pub drainage_area_acres: f64,
    /// Spacing bucket label
    pub spacing_label: String,
}

/// Volume bucket assigned from cumulative production.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeClassification {
    pub volume_label: String,
}

/// A well together with both bucket assignments and its joint cluster key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedWell {
    pub well: Well,
    pub spacing: SpacingResult,
    pub volume: VolumeClassification,
    /// `spacing_label & volume_label`
    pub combined_label: String,
}

impl ClassifiedWell {
    pub fn spacing_label(&self) -> &str {
        &self.spacing.spacing_label
    }

    pub fn volume_label(&self) -> &str {
        &self.volume.volume_label
    }
}
