//! Nearest-point distance queries used by the distance field sampler

use cloudmesh_core::{squared_distance, NearestDistance, Point3f};
use rstar::RTree;
use serde::{Deserialize, Serialize};

/// Which index answers the nearest-point queries during the field fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NearestSearch {
    /// Scan every point for every query, O(N) per node
    #[default]
    BruteForce,
    /// R*-tree over the cloud; same values, much cheaper for large clouds
    RTree,
}

/// Linear scan over the cloud
pub struct BruteForceSearch<'a> {
    points: &'a [Point3f],
}

impl<'a> BruteForceSearch<'a> {
    pub fn new(points: &'a [Point3f]) -> Self {
        Self { points }
    }
}

impl NearestDistance for BruteForceSearch<'_> {
    fn nearest_distance(&self, query: &Point3f) -> f32 {
        self.points
            .iter()
            .map(|point| squared_distance(query, point))
            .fold(f32::INFINITY, f32::min)
            .sqrt()
    }
}

/// Bulk-loaded R*-tree over the cloud, backed by `rstar`.
///
/// Duplicate points and points sharing a coordinate value (stacked slices) are
/// fine. The tree only picks the closest point; the distance itself goes through
/// [`squared_distance`] so it matches [`BruteForceSearch`] bit for bit.
pub struct RTreeSearch {
    tree: RTree<[f32; 3]>,
}

impl RTreeSearch {
    pub fn new(points: &[Point3f]) -> Self {
        let coords = points.iter().map(|p| [p.x, p.y, p.z]).collect();
        Self {
            tree: RTree::bulk_load(coords),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl NearestDistance for RTreeSearch {
    fn nearest_distance(&self, query: &Point3f) -> f32 {
        match self.tree.nearest_neighbor(&[query.x, query.y, query.z]) {
            Some(&[x, y, z]) => squared_distance(query, &Point3f::new(x, y, z)).sqrt(),
            None => f32::INFINITY,
        }
    }
}

/// Build the index selected by `strategy`
pub fn build_search<'a>(
    strategy: NearestSearch,
    points: &'a [Point3f],
) -> Box<dyn NearestDistance + 'a> {
    match strategy {
        NearestSearch::BruteForce => Box::new(BruteForceSearch::new(points)),
        NearestSearch::RTree => Box::new(RTreeSearch::new(points)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_brute_force_single_point() {
        let points = vec![Point3f::new(1.0, 2.0, 2.0)];
        let search = BruteForceSearch::new(&points);

        assert_eq!(search.nearest_distance(&Point3f::origin()), 3.0);
        assert_eq!(search.nearest_distance(&Point3f::new(1.0, 2.0, 2.0)), 0.0);
    }

    #[test]
    fn test_empty_set_is_infinitely_far() {
        let points: Vec<Point3f> = Vec::new();
        assert_eq!(
            BruteForceSearch::new(&points).nearest_distance(&Point3f::origin()),
            f32::INFINITY
        );
        assert_eq!(
            RTreeSearch::new(&points).nearest_distance(&Point3f::origin()),
            f32::INFINITY
        );
    }

    #[test]
    fn test_rtree_matches_brute_force_bitwise() {
        let mut rng = StdRng::seed_from_u64(7);
        let points: Vec<Point3f> = (0..500)
            .map(|_| {
                Point3f::new(
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-5.0..5.0),
                )
            })
            .collect();

        let brute = build_search(NearestSearch::BruteForce, &points);
        let tree = build_search(NearestSearch::RTree, &points);

        for _ in 0..1000 {
            let query = Point3f::new(
                rng.gen_range(-6.0..6.0),
                rng.gen_range(-6.0..6.0),
                rng.gen_range(-6.0..6.0),
            );
            assert_eq!(
                brute.nearest_distance(&query).to_bits(),
                tree.nearest_distance(&query).to_bits(),
                "mismatch at {:?}",
                query
            );
        }
    }

    #[test]
    fn test_rtree_handles_stacked_slices_and_duplicates() {
        // Two 20x20 slices sharing z, plus 100 copies of one point
        let mut points: Vec<Point3f> = (0..2)
            .flat_map(|z| {
                (0..20).flat_map(move |x| {
                    (0..20).map(move |y| Point3f::new(x as f32 * 0.05, y as f32 * 0.05, z as f32))
                })
            })
            .collect();
        points.extend(std::iter::repeat(Point3f::new(0.5, 0.5, 0.5)).take(100));

        let rtree = RTreeSearch::new(&points);
        assert_eq!(rtree.len(), 900);

        let brute = BruteForceSearch::new(&points);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let query = Point3f::new(
                rng.gen_range(-0.5..1.5),
                rng.gen_range(-0.5..1.5),
                rng.gen_range(-0.5..1.5),
            );
            assert_eq!(
                brute.nearest_distance(&query).to_bits(),
                rtree.nearest_distance(&query).to_bits(),
                "mismatch at {:?}",
                query
            );
        }
        assert_eq!(rtree.nearest_distance(&Point3f::new(0.5, 0.5, 0.5)), 0.0);
    }

    #[test]
    fn test_rtree_all_points_identical() {
        let points = vec![Point3f::new(1.0, 1.0, 1.0); 64];
        let rtree = RTreeSearch::new(&points);
        assert!(!rtree.is_empty());
        assert_eq!(rtree.nearest_distance(&Point3f::new(1.0, 1.0, 4.0)), 3.0);
    }
}
