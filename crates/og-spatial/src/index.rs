//! R-tree point index.
//!
//! An R-tree (via `rstar`) maps local `[x, y]` positions back to their index
//! in the slice the tree was built from.  All queries are phrased in terms of
//! those indices so callers can compare "earlier" and "later" points.
//!
//! # Ties
//!
//! Neighbours at exactly the same distance are resolved to the lowest index,
//! which keeps every query deterministic regardless of the tree's internal
//! layout.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use og_core::{LocalPoint, median};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a 2-D `[x, y]` point with its input index.
#[derive(Clone)]
struct PointEntry {
    point: [f64; 2],
    idx:   usize,
}

impl RTreeObject for PointEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PointEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Neighbor ──────────────────────────────────────────────────────────────────

/// Result of a neighbour query: the neighbour's index and its distance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor {
    pub idx:        usize,
    pub distance_m: f64,
}

// ── PointIndex ────────────────────────────────────────────────────────────────

/// Bulk-loaded R-tree over a fixed set of local points.
pub struct PointIndex {
    points: Vec<LocalPoint>,
    tree:   RTree<PointEntry>,
}

impl PointIndex {
    /// Bulk-load the index.  O(N log N), faster than N inserts.
    pub fn build(points: &[LocalPoint]) -> Self {
        let entries: Vec<PointEntry> = points
            .iter()
            .enumerate()
            .map(|(idx, p)| PointEntry { point: p.as_array(), idx })
            .collect();
        Self {
            points: points.to_vec(),
            tree:   RTree::bulk_load(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The single nearest point to `points[idx]` other than itself.
    ///
    /// Equivalent to a k=2 nearest-neighbour query that includes the query
    /// point, with the self-match discarded by index rather than by distance
    /// so coincident duplicates are still reported.  Returns `None` when the
    /// index holds fewer than two points.
    pub fn nearest_other(&self, idx: usize) -> Option<Neighbor> {
        let query = self.points[idx].as_array();
        let mut best: Option<(usize, f64)> = None;
        for (entry, d2) in self.tree.nearest_neighbor_iter_with_distance_2(&query) {
            if entry.idx == idx {
                continue;
            }
            match best {
                None => best = Some((entry.idx, d2)),
                Some((best_idx, best_d2)) if d2 == best_d2 => {
                    if entry.idx < best_idx {
                        best = Some((entry.idx, d2));
                    }
                }
                Some(_) => break,
            }
        }
        best.map(|(idx, d2)| Neighbor { idx, distance_m: d2.sqrt() })
    }

    /// The nearest point to `points[idx]`, other than itself, for which
    /// `accept` holds.
    ///
    /// Walks outward in distance order, so the cost grows with the number of
    /// rejected points closer than the answer.  Ties resolve to the lowest
    /// index, as in [`nearest_other`](Self::nearest_other).
    pub fn nearest_other_where<F>(&self, idx: usize, mut accept: F) -> Option<Neighbor>
    where
        F: FnMut(usize) -> bool,
    {
        let query = self.points[idx].as_array();
        let mut best: Option<(usize, f64)> = None;
        for (entry, d2) in self.tree.nearest_neighbor_iter_with_distance_2(&query) {
            if let Some((_, best_d2)) = best {
                if d2 > best_d2 {
                    break;
                }
            }
            if entry.idx == idx || !accept(entry.idx) {
                continue;
            }
            match best {
                Some((best_idx, _)) if best_idx < entry.idx => {}
                _ => best = Some((entry.idx, d2)),
            }
        }
        best.map(|(idx, d2)| Neighbor { idx, distance_m: d2.sqrt() })
    }

    /// Indices of every point within `radius_m` of `points[idx]` (inclusive),
    /// excluding itself, in ascending index order.
    pub fn others_within(&self, idx: usize, radius_m: f64) -> Vec<usize> {
        let query = self.points[idx].as_array();
        let mut found: Vec<usize> = self
            .tree
            .locate_within_distance(query, radius_m * radius_m)
            .map(|entry| entry.idx)
            .filter(|&other| other != idx)
            .collect();
        found.sort_unstable();
        found
    }

    /// Distance from every point to its nearest other point, in index order.
    ///
    /// Empty when the index holds fewer than two points.
    pub fn nearest_distances(&self) -> Vec<f64> {
        (0..self.points.len())
            .filter_map(|i| self.nearest_other(i))
            .map(|n| n.distance_m)
            .collect()
    }

    /// Median nearest-neighbour distance, the dataset's characteristic
    /// spacing.  `None` when the index holds fewer than two points.
    pub fn median_spacing(&self) -> Option<f64> {
        median(&mut self.nearest_distances())
    }
}
