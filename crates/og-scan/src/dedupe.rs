//! Merging of near-duplicate gap candidates.
//!
//! The two axis scans rediscover the same physical gaps independently, and
//! rotation round-trips add floating-point drift, so the concatenated
//! candidate list holds near-duplicates.  Input order matters: the earlier
//! candidate always survives.

use og_core::{DedupeStrategy, LocalPoint};
use og_spatial::PointIndex;

/// Remove candidates that duplicate an earlier one within `tolerance` metres.
///
/// A negative or NaN tolerance merges nothing.
pub fn dedupe(points: &[LocalPoint], tolerance: f64, strategy: DedupeStrategy) -> Vec<LocalPoint> {
    if points.len() < 2 || !(tolerance >= 0.0) {
        return points.to_vec();
    }
    let index = PointIndex::build(points);
    let keep: Vec<bool> = match strategy {
        DedupeStrategy::NearestPredecessor => nearest_predecessor(&index, tolerance),
        DedupeStrategy::Cluster => cluster(&index, tolerance),
    };
    points
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

/// Drop a point when its nearest other point is within tolerance and has a
/// lower index.
fn nearest_predecessor(index: &PointIndex, tolerance: f64) -> Vec<bool> {
    (0..index.len())
        .map(|i| match index.nearest_other(i) {
            Some(n) => !(n.distance_m <= tolerance && n.idx < i),
            None => true,
        })
        .collect()
}

/// Keep the lowest-indexed point of every connected component of the
/// "within tolerance" graph.
fn cluster(index: &PointIndex, tolerance: f64) -> Vec<bool> {
    let mut sets = DisjointSet::new(index.len());
    for i in 0..index.len() {
        for j in index.others_within(i, tolerance) {
            if j > i {
                sets.union(i, j);
            }
        }
    }
    (0..index.len()).map(|i| sets.find(i) == i).collect()
}

// ── Union-find ────────────────────────────────────────────────────────────────

/// Union-find whose root is always the smallest index in its set.
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect() }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            // Path halving.
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }
}
