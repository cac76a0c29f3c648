//! Unit tests for og-scan.
//!
//! Geometry tests work directly in local metres; solve tests go through
//! latitude/longitude like a real caller.

#[cfg(test)]
mod helpers {
    use og_core::{GeoPoint, LocalPoint};

    /// `rows × cols` grid with `dx` spacing along x and `dy` along y,
    /// row-major from the origin.
    pub fn grid(rows: usize, cols: usize, dx: f64, dy: f64) -> Vec<LocalPoint> {
        let mut pts = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                pts.push(LocalPoint::new(c as f64 * dx, r as f64 * dy));
            }
        }
        pts
    }

    pub fn rotate_all(points: &[LocalPoint], angle: f64) -> Vec<LocalPoint> {
        points.iter().map(|p| p.rotated(angle)).collect()
    }

    /// Square-degree grid anchored at `origin`, skipping `(row, col)` cells.
    pub fn geo_grid(
        origin:  GeoPoint,
        rows:    usize,
        cols:    usize,
        step:    f64,
        skip:    &[(usize, usize)],
    ) -> Vec<GeoPoint> {
        let mut pts = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                if !skip.contains(&(r, c)) {
                    pts.push(GeoPoint::new(origin.lat + r as f64 * step, origin.lon + c as f64 * step));
                }
            }
        }
        pts
    }

    pub fn assert_close(a: LocalPoint, b: LocalPoint, tol: f64) {
        assert!(a.distance(b) <= tol, "{a} vs {b} (tol {tol})");
    }
}

// ── Orientation ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod orientation {
    use std::f64::consts::FRAC_PI_2;

    use og_core::angle::axial_distance;
    use og_core::{LocalPoint, ScanConfig, ScanError};
    use crate::detect_orientation;
    use super::helpers::{grid, rotate_all};

    #[test]
    fn rectangular_grid_axes() {
        // In-row spacing 4 m is strictly tighter than the 6 m row spacing, so
        // the secondary axis comes from the search past the rows.
        let o = detect_orientation(&grid(5, 5, 4.0, 6.0), &ScanConfig::default()).unwrap();
        assert!(axial_distance(o.primary, 0.0) < 1e-9, "primary {}", o.primary);
        assert!(axial_distance(o.secondary, FRAC_PI_2) < 1e-9, "secondary {}", o.secondary);
    }

    #[test]
    fn angles_are_folded() {
        let o = detect_orientation(&grid(4, 6, 3.0, 5.0), &ScanConfig::default()).unwrap();
        for a in [o.primary, o.secondary] {
            assert!((0.0..std::f64::consts::PI).contains(&a), "{a}");
        }
    }

    #[test]
    fn rotation_covariance() {
        let base = grid(6, 6, 4.0, 6.0);
        for theta in [0.3, 1.2, 2.9] {
            let o = detect_orientation(&rotate_all(&base, theta), &ScanConfig::default()).unwrap();
            assert!(axial_distance(o.primary, theta) < 1e-6, "θ={theta}: primary {}", o.primary);
            assert!(
                axial_distance(o.secondary, theta + FRAC_PI_2) < 1e-6,
                "θ={theta}: secondary {}",
                o.secondary
            );
        }
    }

    #[test]
    fn dense_rows_far_apart() {
        // Every tree's four nearest neighbours share its row; the row axis
        // is still only one neighbour away past them.
        for (dx, dy) in [(1.0, 4.5), (0.8, 3.5), (0.5, 6.0)] {
            let o = detect_orientation(&grid(12, 30, dx, dy), &ScanConfig::default()).unwrap();
            assert!(axial_distance(o.primary, 0.0) < 1e-9, "{dx}×{dy}: primary {}", o.primary);
            assert!(
                axial_distance(o.secondary, FRAC_PI_2) < 1e-9,
                "{dx}×{dy}: secondary {}",
                o.secondary
            );
        }
    }

    #[test]
    fn dense_rows_rotated() {
        let pts = rotate_all(&grid(12, 30, 1.0, 4.5), 0.4);
        let o = detect_orientation(&pts, &ScanConfig::default()).unwrap();
        assert!(axial_distance(o.primary, 0.4) < 1e-6, "primary {}", o.primary);
        assert!(axial_distance(o.secondary, 0.4 + FRAC_PI_2) < 1e-6, "secondary {}", o.secondary);
    }

    #[test]
    fn non_orthogonal_axes() {
        // Trees 4 m apart along x; rows 5 m apart along a 75° cross direction,
        // which stays the shortest cross-row vector.
        let cross = 75f64.to_radians();
        let mut pts = Vec::new();
        for r in 0..6 {
            for c in 0..6 {
                let (r, c) = (r as f64, c as f64);
                pts.push(LocalPoint::new(c * 4.0 + r * 5.0 * cross.cos(), r * 5.0 * cross.sin()));
            }
        }
        let o = detect_orientation(&pts, &ScanConfig::default()).unwrap();
        assert!(axial_distance(o.primary, 0.0) < 1e-6);
        assert!(axial_distance(o.secondary, cross) < 1e-6, "secondary {}", o.secondary.to_degrees());
    }

    #[test]
    fn collinear_is_degenerate() {
        let dir = 30f64.to_radians();
        let pts: Vec<LocalPoint> = (0..10)
            .map(|i| LocalPoint::new(i as f64 * 5.0 * dir.cos(), i as f64 * 5.0 * dir.sin()))
            .collect();
        let err = detect_orientation(&pts, &ScanConfig::default()).unwrap_err();
        assert!(matches!(err, ScanError::DegenerateGeometry(_)), "{err}");
    }

    #[test]
    fn coincident_is_degenerate() {
        let pts = vec![LocalPoint::new(2.0, 3.0); 5];
        let err = detect_orientation(&pts, &ScanConfig::default()).unwrap_err();
        assert!(matches!(err, ScanError::DegenerateGeometry(_)));
    }

    #[test]
    fn two_points_are_degenerate() {
        let pts = [LocalPoint::new(0.0, 0.0), LocalPoint::new(5.0, 1.0)];
        let err = detect_orientation(&pts, &ScanConfig::default()).unwrap_err();
        assert!(matches!(err, ScanError::DegenerateGeometry(_)));
    }

    #[test]
    fn single_point_is_insufficient() {
        let err = detect_orientation(&[LocalPoint::new(0.0, 0.0)], &ScanConfig::default()).unwrap_err();
        assert_eq!(err, ScanError::InsufficientData { got: 1 });
    }
}

// ── Axis scan ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod axis {
    use og_core::{LocalPoint, ScanConfig, ScanError};
    use crate::{scan_axis, split_rows};
    use super::helpers::{assert_close, grid, rotate_all};

    fn row(xs: &[f64]) -> Vec<LocalPoint> {
        xs.iter().map(|&x| LocalPoint::new(x, 0.0)).collect()
    }

    #[test]
    fn split_rows_by_across_band() {
        let pts = vec![
            LocalPoint::new(0.0, 0.1),
            LocalPoint::new(4.0, -0.1),
            LocalPoint::new(8.0, 0.0),
            LocalPoint::new(0.0, 6.0),
            LocalPoint::new(4.0, 6.2),
            LocalPoint::new(50.0, 20.0), // lone tree: dropped
        ];
        let rows = split_rows(&pts, 1.0);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].points.len(), 3);
        assert_eq!(rows[1].points.len(), 2);
        assert!(rows[0].points.windows(2).all(|w| w[0].x <= w[1].x));
        assert_eq!(rows[0].intervals(), vec![4.0, 4.0]);
    }

    #[test]
    fn perfect_grid_has_no_gaps() {
        let scan = scan_axis(&grid(5, 8, 4.0, 6.0), 0.0, &ScanConfig::default()).unwrap();
        assert_eq!(scan.rows, 5);
        assert!(scan.gaps.is_empty());
        assert!(scan.candidates.is_empty());
    }

    #[test]
    fn single_missing_tree() {
        let mut pts = grid(3, 10, 4.0, 6.0);
        pts.retain(|p| *p != LocalPoint::new(20.0, 6.0));
        let scan = scan_axis(&pts, 0.0, &ScanConfig::default()).unwrap();
        assert_eq!(scan.gaps.len(), 1);
        assert_eq!(scan.gaps[0].missing_count, 1);
        assert_eq!(scan.candidates.len(), 1);
        assert_close(scan.candidates[0], LocalPoint::new(20.0, 6.0), 1e-9);
    }

    #[test]
    fn run_of_missing_trees_is_interpolated_evenly() {
        let scan = scan_axis(&row(&[0.0, 4.0, 8.0, 24.0, 28.0, 32.0, 36.0]), 0.0, &ScanConfig::default())
            .unwrap();
        assert_eq!(scan.gaps.len(), 1);
        assert_eq!(scan.gaps[0].missing_count, 3);
        let xs: Vec<f64> = scan.candidates.iter().map(|p| p.x).collect();
        for (got, want) in xs.iter().zip([12.0, 16.0, 20.0]) {
            assert!((got - want).abs() < 1e-9, "{xs:?}");
        }
    }

    #[test]
    fn spacing_below_gap_factor_is_not_a_gap() {
        // 6.8 m = 1.7 × 4 m
        let scan = scan_axis(&row(&[0.0, 4.0, 8.0, 12.0, 18.8, 22.8, 26.8]), 0.0, &ScanConfig::default())
            .unwrap();
        assert!(scan.candidates.is_empty());
    }

    #[test]
    fn tolerates_along_row_jitter() {
        let scan = scan_axis(&row(&[0.0, 4.2, 7.9, 12.1, 16.0, 24.1, 28.0]), 0.0, &ScanConfig::default())
            .unwrap();
        assert_eq!(scan.candidates.len(), 1);
        // median interval (3.9 + 4.2) / 2 → 2 segments → midpoint
        assert!((scan.candidates[0].x - 20.05).abs() < 1e-9);
    }

    #[test]
    fn short_row_borrows_scan_spacing() {
        // Middle row has only its two end trees: its single interval is the gap.
        let pts = vec![
            LocalPoint::new(0.0, 0.0),
            LocalPoint::new(5.0, 0.0),
            LocalPoint::new(10.0, 0.0),
            LocalPoint::new(0.0, 5.0),
            LocalPoint::new(10.0, 5.0),
            LocalPoint::new(0.0, 10.0),
            LocalPoint::new(5.0, 10.0),
            LocalPoint::new(10.0, 10.0),
        ];
        let scan = scan_axis(&pts, 0.0, &ScanConfig::default()).unwrap();
        assert_eq!(scan.candidates.len(), 1);
        assert_close(scan.candidates[0], LocalPoint::new(5.0, 5.0), 1e-9);
    }

    #[test]
    fn rotated_scan_returns_unrotated_candidates() {
        let theta = 0.7;
        let mut base = grid(4, 9, 4.0, 6.0);
        let missing = LocalPoint::new(16.0, 12.0);
        base.retain(|p| *p != missing);
        let scan = scan_axis(&rotate_all(&base, theta), theta, &ScanConfig::default()).unwrap();
        assert_eq!(scan.candidates.len(), 1);
        assert_close(scan.candidates[0], missing.rotated(theta), 1e-9);
        assert_close(scan.gaps[0].start, LocalPoint::new(12.0, 12.0).rotated(theta), 1e-9);
    }

    #[test]
    fn zero_spacing_is_degenerate() {
        let pts = vec![
            LocalPoint::new(0.0, 0.0),
            LocalPoint::new(0.0, 0.0),
            LocalPoint::new(0.0, 0.0),
            LocalPoint::new(9.0, 0.0),
        ];
        let err = scan_axis(&pts, 0.0, &ScanConfig::default()).unwrap_err();
        assert!(matches!(err, ScanError::DegenerateGeometry(_)));
    }
}

// ── Deduplication ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod dedupe {
    use og_core::{DedupeStrategy, LocalPoint};
    use crate::dedupe;

    const GREEDY: DedupeStrategy = DedupeStrategy::NearestPredecessor;

    #[test]
    fn zero_distance_always_merges() {
        let p = LocalPoint::new(3.0, 4.0);
        assert_eq!(dedupe(&[p, p], 0.0, GREEDY), vec![p]);
        assert_eq!(dedupe(&[p, p, p], 1.0, DedupeStrategy::Cluster), vec![p]);
    }

    #[test]
    fn beyond_tolerance_never_merges() {
        let pts = [LocalPoint::new(0.0, 0.0), LocalPoint::new(2.0, 0.0)];
        assert_eq!(dedupe(&pts, 1.999, GREEDY), pts.to_vec());
        assert_eq!(dedupe(&pts, 1.999, DedupeStrategy::Cluster), pts.to_vec());
    }

    #[test]
    fn tolerance_is_inclusive() {
        let pts = [LocalPoint::new(0.0, 0.0), LocalPoint::new(2.0, 0.0)];
        assert_eq!(dedupe(&pts, 2.0, GREEDY), vec![pts[0]]);
    }

    #[test]
    fn earliest_candidate_survives() {
        let pts = [
            LocalPoint::new(10.0, 0.0),
            LocalPoint::new(0.0, 0.0),
            LocalPoint::new(10.0, 0.1),
            LocalPoint::new(0.1, 0.0),
        ];
        assert_eq!(dedupe(&pts, 0.5, GREEDY), vec![pts[0], pts[1]]);
    }

    #[test]
    fn greedy_rule_is_not_transitive() {
        // A–B 0.9 m, B–C 0.8 m, A–C 1.7 m with a 1 m tolerance.  B's nearest
        // neighbour is the later C, so B survives alongside A.
        let pts = [LocalPoint::new(0.0, 0.0), LocalPoint::new(0.9, 0.0), LocalPoint::new(1.7, 0.0)];
        assert_eq!(dedupe(&pts, 1.0, GREEDY), vec![pts[0], pts[1]]);
        assert_eq!(dedupe(&pts, 1.0, DedupeStrategy::Cluster), vec![pts[0]]);
    }

    #[test]
    fn negative_tolerance_merges_nothing() {
        let p = LocalPoint::new(1.0, 1.0);
        assert_eq!(dedupe(&[p, p], -1.0, GREEDY).len(), 2);
    }

    #[test]
    fn empty_and_single() {
        assert!(dedupe(&[], 1.0, GREEDY).is_empty());
        assert_eq!(dedupe(&[LocalPoint::new(1.0, 2.0)], 1.0, GREEDY).len(), 1);
    }
}

// ── Solve ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod solve {
    use og_core::{GeoPoint, GeoProjector, LocalPoint, ScanConfig, ScanError, ScanWarning};
    use crate::{AxisScan, OrchardScanner, Orientation, ScanObserver};
    use super::helpers::geo_grid;

    const ORIGIN: GeoPoint = GeoPoint { lat: -32.328, lon: 18.826 };

    #[test]
    fn single_point_is_insufficient() {
        let err = OrchardScanner::default().solve(&[ORIGIN]).unwrap_err();
        assert_eq!(err, ScanError::InsufficientData { got: 1 });
        let err = OrchardScanner::default().solve(&[]).unwrap_err();
        assert_eq!(err, ScanError::InsufficientData { got: 0 });
    }

    #[test]
    fn nan_coordinate_is_rejected() {
        let mut trees = geo_grid(ORIGIN, 3, 3, 0.0002, &[]);
        trees[4].lon = f64::NAN;
        let err = OrchardScanner::default().solve(&trees).unwrap_err();
        assert_eq!(err, ScanError::InvalidCoordinate { index: 4 });
    }

    #[test]
    fn invalid_config_is_rejected() {
        let scanner = OrchardScanner::new(ScanConfig { gap_factor: 0.5, ..ScanConfig::default() });
        let err = scanner.solve(&geo_grid(ORIGIN, 3, 3, 0.0002, &[])).unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }

    #[test]
    fn collinear_input_is_degenerate() {
        let trees: Vec<GeoPoint> = (0..8)
            .map(|i| GeoPoint::new(ORIGIN.lat + i as f64 * 0.0001, ORIGIN.lon + i as f64 * 0.0002))
            .collect();
        let err = OrchardScanner::default().solve(&trees).unwrap_err();
        assert!(matches!(err, ScanError::DegenerateGeometry(_)), "{err}");
    }

    #[test]
    fn perfect_grid_is_empty_not_an_error() {
        let s = OrchardScanner::default().solve(&geo_grid(ORIGIN, 6, 7, 0.0002, &[])).unwrap();
        assert!(s.is_empty());
        assert!(s.missing_local.is_empty());
        assert_eq!(s.merge_tolerance_m, None);
        assert!(s.warnings.is_empty());
    }

    #[test]
    fn one_interior_gap() {
        let trees = geo_grid(ORIGIN, 6, 6, 0.0002, &[(2, 3)]);
        let s = OrchardScanner::default().solve(&trees).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.missing_local.len(), 1);

        let tol = s.merge_tolerance_m.unwrap();
        let truth = GeoPoint::new(ORIGIN.lat + 2.0 * 0.0002, ORIGIN.lon + 3.0 * 0.0002);
        let proj = GeoProjector::new(s.reference);
        assert!(proj.to_local(s.missing[0]).distance(proj.to_local(truth)) <= tol);
        // The geo and local forms describe the same point.
        assert!(proj.to_local(s.missing[0]).distance(s.missing_local[0]) < 1e-6);
    }

    #[test]
    fn dense_planting_gap() {
        // 12 rows 4.5 m apart, 30 trees 1 m apart in each, one tree absent.
        let frame = GeoProjector::new(ORIGIN);
        let mut trees = Vec::new();
        for r in 0..12 {
            for c in 0..30 {
                if (r, c) != (6, 14) {
                    trees.push(frame.to_geo(LocalPoint::new(c as f64, r as f64 * 4.5)));
                }
            }
        }
        let truth = frame.to_geo(LocalPoint::new(14.0, 27.0));

        let s = OrchardScanner::default().solve(&trees).unwrap();
        assert_eq!(s.len(), 1, "{:?}", s.missing);
        let proj = GeoProjector::new(s.reference);
        assert!(proj.to_local(s.missing[0]).distance(proj.to_local(truth)) <= s.merge_tolerance_m.unwrap());
    }

    #[test]
    fn merge_tolerance_is_fraction_of_tree_spacing() {
        let trees = geo_grid(ORIGIN, 5, 5, 0.0002, &[(2, 2)]);
        let s = OrchardScanner::default().solve(&trees).unwrap();
        // Tightest spacing is east-west: 0.0002° × cos(lat) × R.
        let spacing = 0.0002f64.to_radians() * s.reference.lat.to_radians().cos() * og_core::EARTH_RADIUS_M;
        assert!((s.merge_tolerance_m.unwrap() - 0.4 * spacing).abs() < 1e-6);
    }

    #[test]
    fn wide_extent_raises_warning() {
        // 0.01° steps → roughly 9 km across.
        let trees = geo_grid(ORIGIN, 10, 10, 0.01, &[(4, 4)]);
        let s = OrchardScanner::default().solve(&trees).unwrap();
        assert_eq!(s.warnings.len(), 1);
        assert!(matches!(s.warnings[0], ScanWarning::ProjectionRange { extent_m, .. } if extent_m > 5_000.0));
        assert_eq!(s.len(), 1);
    }

    #[derive(Default)]
    struct Recorder {
        projected:    usize,
        orientation:  Option<Orientation>,
        axes:         Vec<f64>,
        merged:       Option<(usize, usize)>,
        warnings:     usize,
    }

    impl ScanObserver for Recorder {
        fn on_projected(&mut self, _reference: GeoPoint, _extent_m: f64) {
            self.projected += 1;
        }
        fn on_orientation(&mut self, orientation: &Orientation) {
            self.orientation = Some(*orientation);
        }
        fn on_axis_scanned(&mut self, scan: &AxisScan) {
            self.axes.push(scan.angle);
        }
        fn on_deduplicated(&mut self, before: usize, after: usize, _tolerance_m: f64) {
            self.merged = Some((before, after));
        }
        fn on_warning(&mut self, _warning: &ScanWarning) {
            self.warnings += 1;
        }
    }

    #[test]
    fn observer_sees_every_phase() {
        let trees = geo_grid(ORIGIN, 6, 6, 0.0002, &[(3, 2)]);
        let mut rec = Recorder::default();
        let s = OrchardScanner::default().solve_with_observer(&trees, &mut rec).unwrap();
        assert_eq!(rec.projected, 1);
        let o = rec.orientation.unwrap();
        assert_eq!(rec.axes, vec![o.primary, o.secondary]);
        // Both scans find the same gap; one survives.
        assert_eq!(rec.merged, Some((2, 1)));
        assert_eq!(rec.warnings, 0);
        assert_eq!(s.orientation, o);
    }
}
