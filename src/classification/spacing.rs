//! Per-zone nearest-neighbour spacing.
//!
//! Builds one `SpatialIndex` per zone and reports, for each well, the distance
//! to the closest other well in the same zone.

use super::{ClassificationError, SpatialIndex};
use crate::types::{SingleWellPolicy, Well};
use tracing::debug;

/// Nearest-neighbour distance calculator for the wells of a single zone
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneSpacingAnalyzer {
    policy: SingleWellPolicy,
}

impl ZoneSpacingAnalyzer {
    pub fn new(policy: SingleWellPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SingleWellPolicy {
        self.policy
    }

    /// Nearest-neighbour distance for each well, aligned with `wells`.
    ///
    /// A lone well gets `+inf` under `SingleWellPolicy::Unbounded`.
    ///
    /// # Errors
    /// - `NonFiniteCoordinate` if any well has a NaN/inf coordinate
    /// - `InsufficientNeighbors` for a lone well under `SingleWellPolicy::Reject`
    pub fn compute_nearest_distances(&self, wells: &[Well]) -> Result<Vec<f64>, ClassificationError> {
        if let Some(bad) = wells.iter().find(|w| !w.x.is_finite() || !w.y.is_finite()) {
            return Err(ClassificationError::NonFiniteCoordinate {
                well_id: bad.id.clone(),
                x: bad.x,
                y: bad.y,
            });
        }

        match (wells.len(), self.policy) {
            (0, _) => return Ok(Vec::new()),
            (1, SingleWellPolicy::Unbounded) => {
                debug!(well = %wells[0].id, "Lone well in zone, nearest distance unbounded");
                return Ok(vec![f64::INFINITY]);
            }
            (1, SingleWellPolicy::Reject) => {
                return Err(ClassificationError::InsufficientNeighbors { wells: 1 });
            }
            _ => {}
        }

        let index = SpatialIndex::new(wells.iter().map(|w| [w.x, w.y]).collect());
        Ok((0..wells.len())
            .map(|i| index.nearest_other(i).map_or(f64::INFINITY, |(_, d)| d))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well(id: &str, x: f64, y: f64) -> Well {
        Well::new(id, "A", x, y, 1.0)
    }

    #[test]
    fn test_collinear_wells() {
        let wells = vec![well("w1", 0.0, 0.0), well("w2", 10.0, 0.0), well("w3", 30.0, 0.0)];
        let d = ZoneSpacingAnalyzer::default()
            .compute_nearest_distances(&wells)
            .expect("finite coordinates");
        assert_eq!(d, vec![10.0, 10.0, 20.0]);
    }

    #[test]
    fn test_empty_zone() {
        let d = ZoneSpacingAnalyzer::default()
            .compute_nearest_distances(&[])
            .expect("empty is fine");
        assert!(d.is_empty());
    }

    #[test]
    fn test_single_well_unbounded() {
        let d = ZoneSpacingAnalyzer::new(SingleWellPolicy::Unbounded)
            .compute_nearest_distances(&[well("solo", 3.0, 4.0)])
            .expect("sentinel policy");
        assert_eq!(d, vec![f64::INFINITY]);
    }

    #[test]
    fn test_single_well_rejected() {
        let err = ZoneSpacingAnalyzer::new(SingleWellPolicy::Reject)
            .compute_nearest_distances(&[well("solo", 3.0, 4.0)])
            .unwrap_err();
        assert_eq!(err, ClassificationError::InsufficientNeighbors { wells: 1 });
    }

    #[test]
    fn test_reject_policy_allows_pairs() {
        let d = ZoneSpacingAnalyzer::new(SingleWellPolicy::Reject)
            .compute_nearest_distances(&[well("a", 0.0, 0.0), well("b", 3.0, 4.0)])
            .expect("two wells");
        assert_eq!(d, vec![5.0, 5.0]);
    }

    #[test]
    fn test_non_finite_coordinate() {
        let wells = vec![well("ok", 0.0, 0.0), well("bad", f64::NAN, 1.0)];
        let err = ZoneSpacingAnalyzer::default()
            .compute_nearest_distances(&wells)
            .unwrap_err();
        assert!(matches!(err, ClassificationError::NonFiniteCoordinate { ref well_id, .. } if well_id == "bad"));
    }

    #[test]
    fn test_twin_wells_are_zero_apart() {
        let wells = vec![well("a", 7.0, 7.0), well("b", 7.0, 7.0), well("c", 100.0, 7.0)];
        let d = ZoneSpacingAnalyzer::default()
            .compute_nearest_distances(&wells)
            .expect("finite");
        assert_eq!(d, vec![0.0, 0.0, 93.0]);
    }
}
