//! Cluster Configuration - input columns, ranges and policies as TOML values
//!
//! Each struct implements `Default` with the values the interactive tool
//! started from, so the classifier runs unchanged without a config file.

use super::defaults;
use crate::classification::{ClassificationError, RangeSet};
use crate::dataset::Delimiter;
use crate::types::SingleWellPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a classification run.
///
/// Load with `ClusterConfig::load()` which searches:
/// 1. `$WELL_CLUSTER_CONFIG` env var
/// 2. `./cluster_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Well table location and column mapping
    #[serde(default)]
    pub input: InputConfig,

    /// Drainage-area buckets
    #[serde(default)]
    pub spacing: SpacingConfig,

    /// Cumulative-volume buckets
    #[serde(default)]
    pub volume: VolumeConfig,

    /// Engine behaviour
    #[serde(default)]
    pub engine: EngineConfig,

    /// Per-zone CSV export
    #[serde(default)]
    pub export: ExportConfig,
}

impl ClusterConfig {
    /// Load configuration using the standard search order:
    /// 1. `$WELL_CLUSTER_CONFIG` environment variable
    /// 2. `./cluster_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded cluster config from {}", defaults::CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", defaults::CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_ENV_VAR);
            }
        }

        // 2. Check ./cluster_config.toml
        let local = PathBuf::from(defaults::DEFAULT_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded cluster config from ./{}", defaults::DEFAULT_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::DEFAULT_CONFIG_FILE);
                }
            }
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", defaults::DEFAULT_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::parse(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate TOML text. Unknown keys only warn.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        for w in &super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Cluster config saved");
        Ok(())
    }

    /// Validate the whole configuration, collecting every problem.
    ///
    /// Rules:
    /// - Column names must be non-empty and distinct
    /// - Units must be non-empty
    /// - Each metric needs 1-10 intervals that form a valid `RangeSet`
    /// - The export suffix must be a plain, non-empty file name fragment
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        // Input columns
        let columns = self.input.required_columns();
        for (key, name) in &columns {
            if name.trim().is_empty() {
                errors.push(format!("input.{key} must not be empty"));
            }
        }
        let mut seen = HashSet::new();
        for (key, name) in &columns {
            if !name.trim().is_empty() && !seen.insert(name.trim()) {
                errors.push(format!("input.{key} ('{name}') duplicates another column"));
            }
        }

        // Ranges
        Self::check_metric("spacing", &self.spacing.unit, self.spacing.range_set(), &mut errors);
        Self::check_metric("volume", &self.volume.unit, self.volume.range_set(), &mut errors);

        // Export
        let suffix = &self.export.file_suffix;
        if suffix.is_empty() {
            errors.push("export.file_suffix must not be empty".to_string());
        } else if suffix.contains('/') || suffix.contains('\\') {
            errors.push(format!("export.file_suffix ('{suffix}') must not contain path separators"));
        }

        // Range counts and suspicious bounds
        let (range_errors, range_warnings) = super::validation::validate_metric_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_metric(
        name: &str,
        unit: &str,
        range_set: Result<RangeSet, ClassificationError>,
        errors: &mut Vec<String>,
    ) {
        if unit.trim().is_empty() {
            errors.push(format!("{name}.unit must not be empty"));
        }
        if let Err(e) = range_set {
            errors.push(format!("{name}.ranges: {e}"));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Serialize(toml::ser::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Serialize(e) => write!(f, "Config serialization error: {}", e),
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Input Table
// ============================================================================

/// Where the well table lives and which columns hold the required fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path of the well table CSV
    #[serde(default = "default_input_path")]
    pub path: PathBuf,

    /// Field delimiter: "auto", "," or ";"
    #[serde(default)]
    pub delimiter: Delimiter,

    /// Geological zone column
    #[serde(default = "default_zone_column")]
    pub zone_column: String,

    /// Planar X coordinate column (metres)
    #[serde(default = "default_x_column")]
    pub x_column: String,

    /// Planar Y coordinate column (metres)
    #[serde(default = "default_y_column")]
    pub y_column: String,

    /// Cumulative production column
    #[serde(default = "default_cum_column")]
    pub cum_column: String,

    /// Optional well identifier column; rows are numbered when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_column: Option<String>,
}

fn default_input_path() -> PathBuf {
    PathBuf::from(defaults::DEFAULT_INPUT_PATH)
}
fn default_zone_column() -> String {
    defaults::DEFAULT_ZONE_COLUMN.to_string()
}
fn default_x_column() -> String {
    defaults::DEFAULT_X_COLUMN.to_string()
}
fn default_y_column() -> String {
    defaults::DEFAULT_Y_COLUMN.to_string()
}
fn default_cum_column() -> String {
    defaults::DEFAULT_CUM_COLUMN.to_string()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
            delimiter: Delimiter::default(),
            zone_column: default_zone_column(),
            x_column: default_x_column(),
            y_column: default_y_column(),
            cum_column: default_cum_column(),
            id_column: None,
        }
    }
}

impl InputConfig {
    /// `(config key, column name)` for every mapped column.
    fn required_columns(&self) -> Vec<(&'static str, &str)> {
        let mut columns = vec![
            ("zone_column", self.zone_column.as_str()),
            ("x_column", self.x_column.as_str()),
            ("y_column", self.y_column.as_str()),
            ("cum_column", self.cum_column.as_str()),
        ];
        if let Some(ref id) = self.id_column {
            columns.push(("id_column", id.as_str()));
        }
        columns
    }
}

// ============================================================================
// Ranges
// ============================================================================

/// Drainage-area buckets (acres by default)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingConfig {
    #[serde(default = "default_spacing_unit")]
    pub unit: String,

    /// `[lower, upper]` pairs; use `-inf` / `inf` for the open ends
    #[serde(default = "default_spacing_ranges")]
    pub ranges: Vec<[f64; 2]>,
}

fn default_spacing_unit() -> String {
    defaults::DEFAULT_SPACING_UNIT.to_string()
}
fn default_spacing_ranges() -> Vec<[f64; 2]> {
    defaults::DEFAULT_SPACING_RANGES.to_vec()
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            unit: default_spacing_unit(),
            ranges: default_spacing_ranges(),
        }
    }
}

impl SpacingConfig {
    /// Build the validated spacing `RangeSet`.
    pub fn range_set(&self) -> Result<RangeSet, ClassificationError> {
        RangeSet::new(self.ranges.iter().copied(), self.unit.trim())
    }
}

/// Cumulative-volume buckets (MSTB by default)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeConfig {
    #[serde(default = "default_volume_unit")]
    pub unit: String,

    /// `[lower, upper]` pairs; use `-inf` / `inf` for the open ends
    #[serde(default = "default_volume_ranges")]
    pub ranges: Vec<[f64; 2]>,
}

fn default_volume_unit() -> String {
    defaults::DEFAULT_VOLUME_UNIT.to_string()
}
fn default_volume_ranges() -> Vec<[f64; 2]> {
    defaults::DEFAULT_VOLUME_RANGES.to_vec()
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            unit: default_volume_unit(),
            ranges: default_volume_ranges(),
        }
    }
}

impl VolumeConfig {
    /// Build the validated volume `RangeSet`.
    pub fn range_set(&self) -> Result<RangeSet, ClassificationError> {
        RangeSet::new(self.ranges.iter().copied(), self.unit.trim())
    }
}

// ============================================================================
// Engine
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Classify zones on the rayon thread pool
    #[serde(default = "default_parallel_zones")]
    pub parallel_zones: bool,

    /// Handling of zones with a single well
    #[serde(default)]
    pub single_well_policy: SingleWellPolicy,
}

fn default_parallel_zones() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_zones: default_parallel_zones(),
            single_well_policy: SingleWellPolicy::default(),
        }
    }
}

// ============================================================================
// Export
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving `{zone}{file_suffix}` files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_file_suffix() -> String {
    defaults::DEFAULT_EXPORT_SUFFIX.to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_suffix: default_file_suffix(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
