//! User-defined range bucketing
//!
//! A `RangeSet` is an ordered list of non-overlapping intervals with one label
//! per interval. Labels follow the operator-facing convention:
//! - first interval: `less than {upper} {unit}`
//! - interior intervals: `between {lower} {unit} and {upper} {unit}`
//! - last interval: `greater than {lower} {unit}`
//!
//! Binning only looks at the lower bounds of intervals 2..N. Interval `i`
//! therefore holds `[lower_i, lower_{i+1})`: boundaries are left-closed, a gap
//! between `upper_i` and `lower_{i+1}` stays in interval `i`, and anything
//! below or above every bound lands in the first or last interval.

use super::ClassificationError;
use serde::{Deserialize, Serialize};

/// One classification boundary pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Interval open towards -inf.
    pub fn below(upper: f64) -> Self {
        Self::new(f64::NEG_INFINITY, upper)
    }

    /// Interval open towards +inf.
    pub fn above(lower: f64) -> Self {
        Self::new(lower, f64::INFINITY)
    }
}

impl From<(f64, f64)> for Interval {
    fn from((lower, upper): (f64, f64)) -> Self {
        Self::new(lower, upper)
    }
}

impl From<[f64; 2]> for Interval {
    fn from([lower, upper]: [f64; 2]) -> Self {
        Self::new(lower, upper)
    }
}

/// Validated, labelled set of intervals for one scalar metric
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSet {
    intervals: Vec<Interval>,
    labels: Vec<String>,
    unit: String,
}

impl RangeSet {
    /// Validate `intervals` and bake `unit` into the labels.
    ///
    /// # Errors
    /// - `EmptyRangeSet` for an empty list
    /// - `InvalidInterval` when a bound is NaN or `lower >= upper`
    /// - `OverlappingRanges` when `intervals[i].upper > intervals[i + 1].lower`
    pub fn new<I>(intervals: I, unit: impl Into<String>) -> Result<Self, ClassificationError>
    where
        I: IntoIterator,
        I::Item: Into<Interval>,
    {
        let intervals: Vec<Interval> = intervals.into_iter().map(Into::into).collect();
        let unit = unit.into();
        Self::validate(&intervals)?;
        let labels = Self::build_labels(&intervals, &unit);
        Ok(Self {
            intervals,
            labels,
            unit,
        })
    }

    fn validate(intervals: &[Interval]) -> Result<(), ClassificationError> {
        if intervals.is_empty() {
            return Err(ClassificationError::EmptyRangeSet);
        }
        for (index, iv) in intervals.iter().enumerate() {
            if iv.lower.is_nan() || iv.upper.is_nan() || iv.lower >= iv.upper {
                return Err(ClassificationError::InvalidInterval {
                    index,
                    lower: iv.lower,
                    upper: iv.upper,
                });
            }
        }
        for (index, pair) in intervals.windows(2).enumerate() {
            if pair[0].upper > pair[1].lower {
                return Err(ClassificationError::OverlappingRanges {
                    index,
                    upper: pair[0].upper,
                    next_lower: pair[1].lower,
                });
            }
        }
        Ok(())
    }

    fn build_labels(intervals: &[Interval], unit: &str) -> Vec<String> {
        let last = intervals.len() - 1;
        intervals
            .iter()
            .enumerate()
            .map(|(i, iv)| match i {
                0 => format!("less than {} {unit}", iv.upper),
                i if i == last => format!("greater than {} {unit}", iv.lower),
                _ => format!("between {} {unit} and {} {unit}", iv.lower, iv.upper),
            })
            .collect()
    }

    /// Index of the interval `value` falls into.
    ///
    /// # Errors
    /// `Unclassifiable` for NaN.
    pub fn bucket_index(&self, value: f64) -> Result<usize, ClassificationError> {
        if value.is_nan() {
            return Err(ClassificationError::Unclassifiable {
                unit: self.unit.clone(),
                value,
            });
        }
        Ok(self.intervals[1..].partition_point(|iv| iv.lower <= value))
    }

    /// Label of the interval `value` falls into.
    ///
    /// # Errors
    /// `Unclassifiable` for NaN.
    pub fn classify(&self, value: f64) -> Result<&str, ClassificationError> {
        let index = self.bucket_index(value)?;
        Ok(&self.labels[index])
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Labels in interval order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Always false; construction rejects empty sets.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}
