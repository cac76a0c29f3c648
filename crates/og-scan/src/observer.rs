//! Solve observer trait for diagnostics and progress reporting.

use og_core::{GeoPoint, ScanWarning};

use crate::{AxisScan, Orientation};

/// Callbacks invoked by [`OrchardScanner::solve_with_observer`][crate::OrchardScanner::solve_with_observer]
/// as each phase completes.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — axis summary
///
/// ```rust,ignore
/// struct AxisPrinter;
///
/// impl ScanObserver for AxisPrinter {
///     fn on_axis_scanned(&mut self, scan: &AxisScan) {
///         println!("{:.1}°: {} gaps", scan.angle.to_degrees(), scan.gaps.len());
///     }
/// }
/// ```
pub trait ScanObserver {
    /// Called once the input is projected.  `extent_m` is the diagonal of
    /// the local bounding box.
    fn on_projected(&mut self, _reference: GeoPoint, _extent_m: f64) {}

    fn on_orientation(&mut self, _orientation: &Orientation) {}

    /// Called once per axis, primary first.
    fn on_axis_scanned(&mut self, _scan: &AxisScan) {}

    /// Called after deduplication with the candidate counts either side.
    fn on_deduplicated(&mut self, _before: usize, _after: usize, _tolerance_m: f64) {}

    fn on_warning(&mut self, _warning: &ScanWarning) {}
}

/// A [`ScanObserver`] that does nothing.
pub struct NoopObserver;

impl ScanObserver for NoopObserver {}
