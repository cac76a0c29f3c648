//! Single-axis gap scan.
//!
//! # Pipeline
//!
//! ```text
//! rotate by -angle            → the axis becomes x ("along"), y is "across"
//! row threshold               = row_threshold_fraction × median NN spacing
//! sort by across, split rows  where consecutive across values jump > threshold
//! per row: sort by along      → intervals, local spacing = median interval
//! interval > gap_factor × local spacing  → gap
//! segments = round(gap / local spacing), missing = segments - 1
//! interpolate at k / segments, rotate back by +angle
//! ```
//!
//! A row with fewer than `min_row_intervals` intervals cannot estimate its
//! own spacing (its only interval may be the gap itself), so it uses the
//! median interval across every row of the scan.
//!
//! Nothing persists between calls.

use log::debug;

use og_core::{LocalPoint, ScanConfig, ScanError, ScanResult, median};
use og_spatial::PointIndex;

// ── Result types ──────────────────────────────────────────────────────────────

/// A spacing anomaly inside one row, in the unrotated local frame.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gap {
    pub start:         LocalPoint,
    pub end:           LocalPoint,
    pub missing_count: usize,
}

/// Everything one axis scan found.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisScan {
    /// Scan direction, radians.
    pub angle:      f64,
    /// Rows with at least two trees.
    pub rows:       usize,
    pub gaps:       Vec<Gap>,
    /// Interpolated missing-tree positions, unrotated local frame.
    pub candidates: Vec<LocalPoint>,
}

/// Trees sharing one across-axis band, in the rotated frame, sorted along
/// the axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub points: Vec<LocalPoint>,
}

impl Row {
    /// Successive along-axis spacings.
    pub fn intervals(&self) -> Vec<f64> {
        self.points.windows(2).map(|w| w[1].x - w[0].x).collect()
    }
}

// ── Row splitting ─────────────────────────────────────────────────────────────

/// Group rotated points into rows by their across-axis (`y`) coordinate.
///
/// Rows with fewer than two points are dropped.  Each returned row is sorted
/// by its along-axis (`x`) coordinate.
pub fn split_rows(rotated: &[LocalPoint], threshold: f64) -> Vec<Row> {
    let mut sorted = rotated.to_vec();
    sorted.sort_unstable_by(|a, b| a.y.total_cmp(&b.y));

    let mut rows = Vec::new();
    let mut current: Vec<LocalPoint> = Vec::new();
    for p in sorted {
        if let Some(last) = current.last() {
            if p.y - last.y > threshold {
                push_row(&mut rows, std::mem::take(&mut current));
            }
        }
        current.push(p);
    }
    push_row(&mut rows, current);
    rows
}

fn push_row(rows: &mut Vec<Row>, mut points: Vec<LocalPoint>) {
    if points.len() < 2 {
        return;
    }
    points.sort_unstable_by(|a, b| a.x.total_cmp(&b.x));
    rows.push(Row { points });
}

// ── Scan ──────────────────────────────────────────────────────────────────────

/// Scan `points` along `angle` and interpolate every missing tree found.
///
/// # Errors
///
/// - [`ScanError::InsufficientData`] for fewer than two points.
/// - [`ScanError::DegenerateGeometry`] when the median nearest-neighbour
///   spacing is zero, so no row threshold exists.
pub fn scan_axis(points: &[LocalPoint], angle: f64, config: &ScanConfig) -> ScanResult<AxisScan> {
    let rotated: Vec<LocalPoint> = points.iter().map(|p| p.rotated(-angle)).collect();

    let spacing = PointIndex::build(&rotated)
        .median_spacing()
        .ok_or(ScanError::InsufficientData { got: points.len() })?;
    if !(spacing > 0.0) {
        return Err(ScanError::DegenerateGeometry(
            "median nearest-neighbour spacing is zero".into(),
        ));
    }
    let threshold = spacing * config.row_threshold_fraction;

    let rows = split_rows(&rotated, threshold);
    let row_intervals: Vec<Vec<f64>> = rows.iter().map(Row::intervals).collect();
    let scan_spacing = median(&mut row_intervals.concat());

    let mut scan = AxisScan { angle, rows: rows.len(), ..AxisScan::default() };

    for (row, intervals) in rows.iter().zip(&row_intervals) {
        if intervals.is_empty() {
            continue;
        }
        let local = if intervals.len() < config.min_row_intervals {
            scan_spacing
        } else {
            median(&mut intervals.clone())
        };
        let Some(local) = local.filter(|s| *s > 0.0) else {
            continue;
        };

        for (i, &interval) in intervals.iter().enumerate() {
            if interval <= local * config.gap_factor {
                continue;
            }
            let segments = (interval / local).round_ties_even() as usize;
            let missing_count = segments.saturating_sub(1);
            if missing_count == 0 {
                continue;
            }
            let (start, end) = (row.points[i], row.points[i + 1]);
            for k in 1..=missing_count {
                let t = k as f64 / segments as f64;
                scan.candidates.push(start.lerp(end, t).rotated(angle));
            }
            scan.gaps.push(Gap {
                start: start.rotated(angle),
                end: end.rotated(angle),
                missing_count,
            });
        }
    }

    debug!(
        "axis {:.2}°: spacing {spacing:.3} m, row threshold {threshold:.3} m, {} rows, {} gaps, {} candidates",
        angle.to_degrees(),
        scan.rows,
        scan.gaps.len(),
        scan.candidates.len()
    );
    Ok(scan)
}
