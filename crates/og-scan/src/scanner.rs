//! The `solve` orchestrator.

use log::{debug, info, warn};

use og_core::{GeoPoint, GeoProjector, LocalPoint, ScanConfig, ScanError, ScanResult, ScanWarning};
use og_spatial::PointIndex;

use crate::axis::{AxisScan, scan_axis};
use crate::dedupe::dedupe;
use crate::observer::{NoopObserver, ScanObserver};
use crate::orientation::{Orientation, detect_orientation};

// ── Solution ──────────────────────────────────────────────────────────────────

/// Inferred missing-tree positions for one survey.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Missing trees, geographic.  Unordered.
    pub missing:           Vec<GeoPoint>,
    /// The same positions in local metres, index-aligned with `missing`.
    pub missing_local:     Vec<LocalPoint>,
    /// Reference coordinate of the local frame.
    pub reference:         GeoPoint,
    pub orientation:       Orientation,
    /// `None` when neither scan produced a candidate.
    pub merge_tolerance_m: Option<f64>,
    pub warnings:          Vec<ScanWarning>,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.missing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }
}

// ── OrchardScanner ────────────────────────────────────────────────────────────

/// Infers missing trees from surveyed tree locations.
///
/// Holds only its configuration, so one scanner can serve any number of
/// independent solves, concurrently if needed.
///
/// # Example
///
/// ```
/// use og_core::GeoPoint;
/// use og_scan::OrchardScanner;
///
/// let mut trees = Vec::new();
/// for r in 0..6 {
///     for c in 0..6 {
///         if (r, c) != (2, 3) {
///             trees.push(GeoPoint::new(-32.328 + r as f64 * 0.0002, 18.826 + c as f64 * 0.0002));
///         }
///     }
/// }
/// let solution = OrchardScanner::default().solve(&trees).unwrap();
/// assert_eq!(solution.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct OrchardScanner {
    config: ScanConfig,
}

impl OrchardScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Infer missing trees from `trees`.
    ///
    /// # Errors
    ///
    /// - [`ScanError::Config`] for an invalid configuration.
    /// - [`ScanError::InsufficientData`] for fewer than two trees.
    /// - [`ScanError::InvalidCoordinate`] for a non-finite or out-of-range
    ///   coordinate.
    /// - [`ScanError::DegenerateGeometry`] when the trees carry no usable
    ///   row structure.
    pub fn solve(&self, trees: &[GeoPoint]) -> ScanResult<Solution> {
        self.solve_with_observer(trees, &mut NoopObserver)
    }

    /// Like [`solve`](Self::solve), reporting each phase to `observer`.
    pub fn solve_with_observer<O: ScanObserver>(
        &self,
        trees:    &[GeoPoint],
        observer: &mut O,
    ) -> ScanResult<Solution> {
        self.config.validate()?;
        if trees.len() < 2 {
            return Err(ScanError::InsufficientData { got: trees.len() });
        }
        if let Some(index) = trees.iter().position(|p| !p.is_valid()) {
            return Err(ScanError::InvalidCoordinate { index });
        }

        // ── Project ───────────────────────────────────────────────────────
        let projector = GeoProjector::from_points(trees)?;
        let local = projector.project_all(trees);
        let extent_m = GeoProjector::extent_m(&local);
        observer.on_projected(projector.reference(), extent_m);

        let mut warnings = Vec::new();
        if extent_m > self.config.max_extent_m {
            let warning = ScanWarning::ProjectionRange {
                extent_m,
                limit_m: self.config.max_extent_m,
            };
            warn!("{warning}");
            observer.on_warning(&warning);
            warnings.push(warning);
        }

        // ── Orientation and axis scans ────────────────────────────────────
        let orientation = detect_orientation(&local, &self.config)?;
        observer.on_orientation(&orientation);

        let (first, second) = self.scan_both(&local, orientation)?;
        observer.on_axis_scanned(&first);
        observer.on_axis_scanned(&second);

        let mut candidates = first.candidates;
        candidates.extend(second.candidates);

        if candidates.is_empty() {
            info!("{} trees, axes {orientation}: no missing trees", trees.len());
            return Ok(Solution {
                missing: Vec::new(),
                missing_local: Vec::new(),
                reference: projector.reference(),
                orientation,
                merge_tolerance_m: None,
                warnings,
            });
        }

        // ── Deduplicate ───────────────────────────────────────────────────
        let spacing = PointIndex::build(&local)
            .median_spacing()
            .filter(|s| *s > 0.0)
            .ok_or_else(|| {
                ScanError::DegenerateGeometry("median tree spacing is zero".into())
            })?;
        let tolerance = spacing * self.config.merge_tolerance_fraction;
        debug!("merge tolerance {tolerance:.3} m (tree spacing {spacing:.3} m)");

        let unique = dedupe(&candidates, tolerance, self.config.dedupe);
        observer.on_deduplicated(candidates.len(), unique.len(), tolerance);
        info!(
            "{} trees, axes {orientation}: merged {} detections into {} missing trees",
            trees.len(),
            candidates.len(),
            unique.len()
        );

        Ok(Solution {
            missing: projector.unproject_all(&unique),
            missing_local: unique,
            reference: projector.reference(),
            orientation,
            merge_tolerance_m: Some(tolerance),
            warnings,
        })
    }

    #[cfg(not(feature = "parallel"))]
    fn scan_both(
        &self,
        local:       &[LocalPoint],
        orientation: Orientation,
    ) -> ScanResult<(AxisScan, AxisScan)> {
        Ok((
            scan_axis(local, orientation.primary, &self.config)?,
            scan_axis(local, orientation.secondary, &self.config)?,
        ))
    }

    #[cfg(feature = "parallel")]
    fn scan_both(
        &self,
        local:       &[LocalPoint],
        orientation: Orientation,
    ) -> ScanResult<(AxisScan, AxisScan)> {
        let (first, second) = rayon::join(
            || scan_axis(local, orientation.primary, &self.config),
            || scan_axis(local, orientation.secondary, &self.config),
        );
        Ok((first?, second?))
    }
}
