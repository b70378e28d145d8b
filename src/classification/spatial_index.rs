//! 2D k-d tree for nearest-neighbour queries over well coordinates.
//!
//! The tree is stored implicitly: `order` is a permutation of point indices
//! arranged so that every sub-slice `[lo, hi)` has its splitting point at the
//! midpoint, with smaller coordinates (on the split axis) to the left.

/// Static 2D k-d tree over a fixed set of points
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    points: Vec<[f64; 2]>,
    order: Vec<usize>,
}

impl SpatialIndex {
    /// Build the index. Points must have finite coordinates.
    pub fn new(points: Vec<[f64; 2]>) -> Self {
        let mut order: Vec<usize> = (0..points.len()).collect();
        Self::build(&points, &mut order, 0);
        Self { points, order }
    }

    fn build(points: &[[f64; 2]], order: &mut [usize], depth: usize) {
        if order.len() <= 1 {
            return;
        }
        let axis = depth % 2;
        let mid = order.len() / 2;
        order.select_nth_unstable_by(mid, |&a, &b| points[a][axis].total_cmp(&points[b][axis]));
        let (left, right) = order.split_at_mut(mid);
        Self::build(points, left, depth + 1);
        Self::build(points, &mut right[1..], depth + 1);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Nearest indexed point to `target`, skipping index `exclude`.
    ///
    /// Returns `(index, distance)`, or `None` when no candidate exists.
    pub fn nearest(&self, target: [f64; 2], exclude: Option<usize>) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        self.search(0, self.order.len(), 0, target, exclude, &mut best);
        best.map(|(idx, d2)| (idx, d2.sqrt()))
    }

    /// Nearest *other* point to the indexed point `index`.
    ///
    /// Coincident points are distinct neighbours at distance 0.
    pub fn nearest_other(&self, index: usize) -> Option<(usize, f64)> {
        let target = *self.points.get(index)?;
        self.nearest(target, Some(index))
    }

    fn search(
        &self,
        lo: usize,
        hi: usize,
        depth: usize,
        target: [f64; 2],
        exclude: Option<usize>,
        best: &mut Option<(usize, f64)>,
    ) {
        if lo >= hi {
            return;
        }
        let mid = lo + (hi - lo) / 2;
        let idx = self.order[mid];
        let p = self.points[idx];

        if exclude != Some(idx) {
            let d2 = squared_distance(p, target);
            if best.map_or(true, |(_, b)| d2 < b) {
                *best = Some((idx, d2));
            }
        }

        let axis = depth % 2;
        let diff = target[axis] - p[axis];
        let (near, far) = if diff < 0.0 {
            ((lo, mid), (mid + 1, hi))
        } else {
            ((mid + 1, hi), (lo, mid))
        };

        self.search(near.0, near.1, depth + 1, target, exclude, best);
        if best.map_or(true, |(_, b)| diff * diff < b) {
            self.search(far.0, far.1, depth + 1, target, exclude, best);
        }
    }
}

fn squared_distance(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn brute_force_nearest_other(points: &[[f64; 2]], index: usize) -> Option<f64> {
        points
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != index)
            .map(|(_, p)| squared_distance(*p, points[index]).sqrt())
            .min_by(f64::total_cmp)
    }

    #[test]
    fn test_empty_and_single() {
        let empty = SpatialIndex::new(Vec::new());
        assert!(empty.is_empty());
        assert!(empty.nearest([0.0, 0.0], None).is_none());

        let single = SpatialIndex::new(vec![[5.0, 5.0]]);
        assert_eq!(single.nearest_other(0), None);
        assert_eq!(single.nearest([8.0, 9.0], None), Some((0, 5.0)));
    }

    #[test]
    fn test_collinear() {
        let index = SpatialIndex::new(vec![[0.0, 0.0], [10.0, 0.0], [30.0, 0.0]]);
        let d: Vec<f64> = (0..3)
            .map(|i| index.nearest_other(i).expect("has neighbour").1)
            .collect();
        assert_eq!(d, vec![10.0, 10.0, 20.0]);
    }

    #[test]
    fn test_coincident_points() {
        let index = SpatialIndex::new(vec![[1.0, 1.0], [1.0, 1.0], [50.0, 50.0]]);
        assert_eq!(index.nearest_other(0), Some((1, 0.0)));
        assert_eq!(index.nearest_other(1), Some((0, 0.0)));
    }

    #[test]
    fn test_out_of_range_index() {
        let index = SpatialIndex::new(vec![[0.0, 0.0], [1.0, 0.0]]);
        assert_eq!(index.nearest_other(7), None);
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(42);
        for n in [2_usize, 3, 7, 64, 500] {
            let points: Vec<[f64; 2]> = (0..n)
                .map(|_| [rng.gen_range(0.0..5_000.0), rng.gen_range(0.0..5_000.0)])
                .collect();
            let index = SpatialIndex::new(points.clone());
            for i in 0..n {
                let (_, got) = index.nearest_other(i).expect("n >= 2");
                let want = brute_force_nearest_other(&points, i).expect("n >= 2");
                assert!((got - want).abs() < 1e-9, "n={n} i={i}: {got} vs {want}");
            }
        }
    }

    #[test]
    fn test_grid_with_duplicate_axis_values() {
        let mut points = Vec::new();
        for x in 0..10 {
            for y in 0..10 {
                points.push([f64::from(x) * 100.0, f64::from(y) * 100.0]);
            }
        }
        let index = SpatialIndex::new(points);
        for i in 0..index.len() {
            let (_, d) = index.nearest_other(i).expect("grid");
            assert!((d - 100.0).abs() < 1e-9);
        }
    }
}
