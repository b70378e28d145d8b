//! Per-zone CSV export
//!
//! Writes one `{zone}{suffix}` file per successfully classified zone: the
//! original input columns followed by the derived spacing and volume fields.
//! A JSON run summary is written alongside.

use crate::classification::{ClassificationReport, RunSummary, ZoneClassification};
use crate::config::defaults::SUMMARY_FILE_NAME;
use crate::config::ExportConfig;
use crate::types::ClassifiedWell;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Columns appended to every exported row
pub const DERIVED_COLUMNS: [&str; 5] = [
    "nearest_distance",
    "spacing_acres",
    "spacing_group",
    "volume_group",
    "combined_group",
];

/// Header used for wells built in code (no raw input row)
const FALLBACK_COLUMNS: [&str; 5] = ["Well", "Zone Name", "X", "Y", "Cum"];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Summary serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Writes classified zones to disk
#[derive(Debug, Clone)]
pub struct ClusterExporter {
    output_dir: PathBuf,
    file_suffix: String,
}

impl ClusterExporter {
    pub fn new(output_dir: impl Into<PathBuf>, file_suffix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_suffix: file_suffix.into(),
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.output_dir.clone(), config.file_suffix.clone())
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Destination file for a zone.
    pub fn zone_path(&self, zone: &str) -> PathBuf {
        self.output_dir.join(zone_file_name(zone, &self.file_suffix))
    }

    /// Write one zone to `zone_path`. `columns` is the input header (may be empty).
    pub fn export_zone(
        &self,
        columns: &[String],
        zone: &ZoneClassification,
    ) -> Result<PathBuf, ExportError> {
        let path = self.zone_path(&zone.zone);
        self.write_zone_file(columns, zone, path)
    }

    /// Write every successful zone of a report; failed zones are skipped.
    ///
    /// Zones whose names sanitize to the same file name get `_2`, `_3`, ...
    /// appended to the stem, so no zone overwrites another.
    pub fn export_report(
        &self,
        columns: &[String],
        report: &ClassificationReport,
    ) -> Result<Vec<PathBuf>, ExportError> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| ExportError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        for e in report.errors() {
            warn!(zone = %e.zone, "Skipping export of failed zone");
        }

        let mut used: HashSet<String> = HashSet::new();
        report
            .zones()
            .map(|zone| {
                let stem = zone_file_stem(&zone.zone);
                let mut name = format!("{stem}{}", self.file_suffix);
                let mut n = 1;
                while !used.insert(name.clone()) {
                    n += 1;
                    name = format!("{stem}_{n}{}", self.file_suffix);
                }
                if n > 1 {
                    warn!(zone = %zone.zone, file = %name, "Zone file name already taken, using a numbered name");
                }
                self.write_zone_file(columns, zone, self.output_dir.join(name))
            })
            .collect()
    }

    /// Write the JSON run summary into the output directory.
    pub fn write_summary(&self, summary: &RunSummary) -> Result<PathBuf, ExportError> {
        let path = self.output_dir.join(SUMMARY_FILE_NAME);
        let json = serde_json::to_string_pretty(summary)?;
        std::fs::write(&path, json).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    fn write_zone_file(
        &self,
        columns: &[String],
        zone: &ZoneClassification,
        path: PathBuf,
    ) -> Result<PathBuf, ExportError> {
        let file = File::create(&path).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        write_zone_csv(BufWriter::new(file), columns, zone).map_err(|source| ExportError::Csv {
            path: path.clone(),
            source,
        })?;
        info!(zone = %zone.zone, wells = zone.len(), path = %path.display(), "Exported zone");
        Ok(path)
    }
}

/// Sanitized zone name: path separators and other characters that are
/// unsafe in file names become `_`.
fn zone_file_stem(zone: &str) -> String {
    let stem: String = zone
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        "unnamed_zone".to_string()
    } else {
        stem
    }
}

/// File name for a zone's export.
pub fn zone_file_name(zone: &str, suffix: &str) -> String {
    format!("{}{suffix}", zone_file_stem(zone))
}

/// Write a zone as comma-separated CSV with a header row. The original
/// input columns come first, then `DERIVED_COLUMNS`.
pub fn write_zone_csv<W: Write>(
    out: W,
    columns: &[String],
    zone: &ZoneClassification,
) -> Result<(), csv::Error> {
    let use_records = !columns.is_empty()
        && zone.wells.iter().all(|w| w.well.record.len() == columns.len());

    let mut writer = csv::Writer::from_writer(out);
    let mut header: Vec<String> = if use_records {
        columns.to_vec()
    } else {
        FALLBACK_COLUMNS.iter().map(ToString::to_string).collect()
    };
    header.extend(DERIVED_COLUMNS.iter().map(ToString::to_string));
    writer.write_record(&header)?;

    for w in &zone.wells {
        let mut row = if use_records {
            w.well.record.clone()
        } else {
            fallback_fields(w)
        };
        row.extend([
            w.spacing.nearest_distance.to_string(),
            w.spacing.drainage_area_acres.to_string(),
            w.spacing.spacing_label.clone(),
            w.volume.volume_label.clone(),
            w.combined_label.clone(),
        ]);
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn fallback_fields(w: &ClassifiedWell) -> Vec<String> {
    vec![
        w.well.id.clone(),
        w.well.zone.clone(),
        w.well.x.to_string(),
        w.well.y.to_string(),
        w.well.cum.to_string(),
    ]
}
