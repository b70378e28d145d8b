//! System-wide default constants.
//!
//! Centralises the built-in values used when no configuration file is present.
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Config Loading
// ============================================================================

/// Environment variable holding an explicit config file path.
pub const CONFIG_ENV_VAR: &str = "WELL_CLUSTER_CONFIG";

/// Config file looked up in the current working directory.
pub const DEFAULT_CONFIG_FILE: &str = "cluster_config.toml";

// ============================================================================
// Input Table
// ============================================================================

pub const DEFAULT_INPUT_PATH: &str = "dfx.csv";
pub const DEFAULT_ZONE_COLUMN: &str = "Zone Name";
pub const DEFAULT_X_COLUMN: &str = "X";
pub const DEFAULT_Y_COLUMN: &str = "Y";
pub const DEFAULT_CUM_COLUMN: &str = "Cum";

// ============================================================================
// Ranges
// ============================================================================

/// Minimum number of intervals per metric.
pub const MIN_RANGES: usize = 1;

/// Maximum number of intervals per metric.
pub const MAX_RANGES: usize = 10;

pub const DEFAULT_SPACING_UNIT: &str = "acres";

/// Five spacing buckets: first ends at 4.0, then 0.1 gaps and 2.0-wide steps.
pub const DEFAULT_SPACING_RANGES: [[f64; 2]; 5] = [
    [f64::NEG_INFINITY, 4.0],
    [4.1, 6.1],
    [6.2, 8.2],
    [8.3, 10.3],
    [10.4, f64::INFINITY],
];

pub const DEFAULT_VOLUME_UNIT: &str = "MSTB";

/// Three volume buckets: first ends at 5.0, then 0.1 gaps and 5.0-wide steps.
pub const DEFAULT_VOLUME_RANGES: [[f64; 2]; 3] = [
    [f64::NEG_INFINITY, 5.0],
    [5.1, 10.1],
    [10.2, f64::INFINITY],
];

// ============================================================================
// Export
// ============================================================================

/// Appended to the zone name to form each export file name.
pub const DEFAULT_EXPORT_SUFFIX: &str = "_clusters.csv";

/// JSON run summary written next to the per-zone exports.
pub const SUMMARY_FILE_NAME: &str = "classification_summary.json";
