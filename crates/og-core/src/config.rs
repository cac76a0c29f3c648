//! Scan tuning parameters.
//!
//! Every constant here is an empirical heuristic for row-crop orchards, not a
//! derived value, so all of them are configurable.  Distances are never
//! configured directly: each threshold is a fraction of the current
//! dataset's median nearest-neighbour spacing.

use crate::{ScanError, ScanResult};

/// How near-duplicate gap candidates from the two axis scans are merged.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DedupeStrategy {
    /// Drop a candidate when its single nearest other candidate lies within
    /// tolerance and comes earlier in the list.  Greedy and non-transitive:
    /// a chain of near-duplicates can leave more than one survivor.
    #[default]
    NearestPredecessor,
    /// Union every pair within tolerance and keep the earliest member of
    /// each connected component.
    Cluster,
}

/// Parameters for one `solve` call.
///
/// Typically built with `ScanConfig::default()` and tweaked field by field,
/// or loaded from JSON by the application crate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScanConfig {
    /// Bins in the bearing histogram over [0, π).  360 → 0.5° bins.
    pub histogram_bins: usize,

    /// Bins within this many degrees of the primary angle are cleared before
    /// the secondary angle is searched.
    pub mask_radius_deg: f64,

    /// Row separation threshold as a fraction of the median spacing.
    pub row_threshold_fraction: f64,

    /// A spacing above `gap_factor × local spacing` is a gap.
    pub gap_factor: f64,

    /// Rows with fewer along-row intervals than this borrow the scan-wide
    /// median interval as their local spacing.
    pub min_row_intervals: usize,

    /// Candidate merge tolerance as a fraction of the median tree spacing.
    /// Must stay below 0.5 so two adjacent missing slots never collapse.
    pub merge_tolerance_fraction: f64,

    /// Extents beyond this many metres raise a projection-range warning.
    pub max_extent_m: f64,

    pub dedupe: DedupeStrategy,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            histogram_bins:           360,
            mask_radius_deg:          15.0,
            row_threshold_fraction:   0.2,
            gap_factor:               1.8,
            min_row_intervals:        2,
            merge_tolerance_fraction: 0.4,
            max_extent_m:             5_000.0,
            dedupe:                   DedupeStrategy::NearestPredecessor,
        }
    }
}

impl ScanConfig {
    /// Width of one histogram bin, radians.
    #[inline]
    pub fn bin_width(&self) -> f64 {
        std::f64::consts::PI / self.histogram_bins as f64
    }

    pub fn mask_radius(&self) -> f64 {
        self.mask_radius_deg.to_radians()
    }

    /// Reject parameter combinations the scan cannot work with.
    pub fn validate(&self) -> ScanResult<()> {
        if self.histogram_bins < 2 {
            return Err(ScanError::Config(format!(
                "histogram_bins must be at least 2, got {}",
                self.histogram_bins
            )));
        }
        if !(0.0..90.0).contains(&self.mask_radius_deg) {
            return Err(ScanError::Config(format!(
                "mask_radius_deg must be in [0, 90), got {}",
                self.mask_radius_deg
            )));
        }
        if !(self.row_threshold_fraction > 0.0 && self.row_threshold_fraction < 1.0) {
            return Err(ScanError::Config(format!(
                "row_threshold_fraction must be in (0, 1), got {}",
                self.row_threshold_fraction
            )));
        }
        if !(self.gap_factor > 1.0) {
            return Err(ScanError::Config(format!(
                "gap_factor must be greater than 1, got {}",
                self.gap_factor
            )));
        }
        if !(self.merge_tolerance_fraction >= 0.0 && self.merge_tolerance_fraction < 0.5) {
            return Err(ScanError::Config(format!(
                "merge_tolerance_fraction must be in [0, 0.5), got {}",
                self.merge_tolerance_fraction
            )));
        }
        if !(self.max_extent_m > 0.0) {
            return Err(ScanError::Config(format!(
                "max_extent_m must be positive, got {}",
                self.max_extent_m
            )));
        }
        Ok(())
    }
}
