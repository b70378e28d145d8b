//! Well Table Loader
//!
//! Parses a delimited well table into `Well` records. The header row names the
//! columns; the zone, X, Y and cumulative-volume columns are located by name
//! (see `InputConfig`), every other column is kept verbatim for export.
//!
//! Both comma- and semicolon-separated files are accepted. With
//! `Delimiter::Auto` the delimiter is chosen from the header row.
//!
//! # Usage
//!
//! ```ignore
//! use well_cluster::{ClusterConfig, WellTable};
//!
//! let config = ClusterConfig::load();
//! let table = WellTable::load(&config.input.path, &config.input)?;
//! ```

use crate::config::InputConfig;
use crate::types::Well;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors while reading the well table
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Well table has no header row")]
    MissingHeader,

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{0}' not found in header")]
    MissingColumn(String),

    #[error("Line {line}: expected {expected} fields, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: column '{column}' has invalid number '{value}'")]
    InvalidNumber {
        line: usize,
        column: String,
        value: String,
    },

    #[error("Well table has no data rows")]
    NoRows,
}

// ============================================================================
// Delimiter
// ============================================================================

/// Field delimiter of the input table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Delimiter {
    /// Pick `;` or `,` from the header row
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = ",", alias = "comma")]
    Comma,
    #[serde(rename = ";", alias = "semicolon")]
    Semicolon,
}

impl Delimiter {
    /// Resolve `Auto` against a header line; fixed delimiters pass through.
    ///
    /// Semicolon wins when the header has more unquoted `;` than `,`.
    pub fn resolve(self, header: &str) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
            Delimiter::Auto => {
                let mut in_quotes = false;
                let (mut commas, mut semicolons) = (0_usize, 0_usize);
                for ch in header.chars() {
                    match ch {
                        '"' => in_quotes = !in_quotes,
                        ',' if !in_quotes => commas += 1,
                        ';' if !in_quotes => semicolons += 1,
                        _ => {}
                    }
                }
                if semicolons > commas {
                    ';'
                } else {
                    ','
                }
            }
        }
    }
}

// ============================================================================
// Well Table
// ============================================================================

/// Column positions of the mapped fields
struct ColumnMap {
    zone: usize,
    x: usize,
    y: usize,
    cum: usize,
    id: Option<usize>,
}

impl ColumnMap {
    fn from_header(columns: &[String], input: &InputConfig) -> Result<Self, DatasetError> {
        let find = |name: &str| {
            columns
                .iter()
                .position(|c| c == name.trim())
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            zone: find(&input.zone_column)?,
            x: find(&input.x_column)?,
            y: find(&input.y_column)?,
            cum: find(&input.cum_column)?,
            id: input.id_column.as_deref().map(find).transpose()?,
        })
    }
}

/// The loaded well table: header plus one `Well` per data row
#[derive(Debug, Clone, PartialEq)]
pub struct WellTable {
    /// Header column names, in input order
    pub columns: Vec<String>,
    /// Delimiter the table was parsed with
    pub delimiter: char,
    pub wells: Vec<Well>,
}

impl WellTable {
    /// Read and parse a well table from disk.
    pub fn load(path: &Path, input: &InputConfig) -> Result<Self, DatasetError> {
        let contents = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse(&contents, input)?;
        info!(
            path = %path.display(),
            wells = table.wells.len(),
            delimiter = %table.delimiter,
            "Loaded well table"
        );
        Ok(table)
    }

    /// Parse well table text.
    ///
    /// Quoted fields may contain the delimiter, `""` escapes and line breaks.
    /// Header names are trimmed; cell values are kept verbatim. Rows whose
    /// cells are all blank are skipped. Empty numeric cells become NaN so the
    /// engine can attribute the problem to the well's zone; non-numeric text
    /// fails.
    pub fn parse(contents: &str, input: &InputConfig) -> Result<Self, DatasetError> {
        let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
        let header = contents
            .lines()
            .find(|l| !l.trim().is_empty())
            .ok_or(DatasetError::MissingHeader)?;
        let delimiter = input.delimiter.resolve(header);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter_byte(delimiter))
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(contents.as_bytes());

        let columns: Vec<String> = reader.headers()?.iter().map(ToString::to_string).collect();
        let map = ColumnMap::from_header(&columns, input)?;
        debug!(columns = columns.len(), delimiter = %delimiter, "Parsed well table header");

        let mut wells = Vec::new();
        for result in reader.records() {
            let raw = result?;
            if raw.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            let line_no = raw
                .position()
                .map_or(0, |p| usize::try_from(p.line()).unwrap_or(usize::MAX));
            if raw.len() != columns.len() {
                return Err(DatasetError::ColumnCount {
                    line: line_no,
                    expected: columns.len(),
                    found: raw.len(),
                });
            }
            let record: Vec<String> = raw.iter().map(ToString::to_string).collect();

            let number = |idx: usize| parse_number(&record[idx], line_no, &columns[idx]);
            let x = number(map.x)?;
            let y = number(map.y)?;
            let cum = number(map.cum)?;
            let id = map
                .id
                .map_or_else(|| (wells.len() + 1).to_string(), |idx| record[idx].clone());
            let zone = record[map.zone].clone();

            wells.push(Well::new(id, zone, x, y, cum).with_record(record));
        }

        if wells.is_empty() {
            return Err(DatasetError::NoRows);
        }

        Ok(Self {
            columns,
            delimiter,
            wells,
        })
    }
}

/// `Delimiter::resolve` only yields `,` or `;`.
fn delimiter_byte(delimiter: char) -> u8 {
    if delimiter == ';' {
        b';'
    } else {
        b','
    }
}

fn parse_number(value: &str, line: usize, column: &str) -> Result<f64, DatasetError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(f64::NAN);
    }
    value.parse::<f64>().map_err(|_| DatasetError::InvalidNumber {
        line,
        column: column.to_string(),
        value: value.to_string(),
    })
}
