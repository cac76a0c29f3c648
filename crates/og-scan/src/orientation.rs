//! Planting-direction detection.
//!
//! # Method
//!
//! ```text
//! for every tree:  bearing to its nearest other tree, folded into [0, π)
//! primary   = mode of the bearing histogram (0.5° bins by default)
//! secondary = mode after clearing ±mask_radius around the primary
//! ```
//!
//! The nearest neighbour almost always lies along the tightest in-row
//! direction, so the primary peak is the row axis.  The secondary peak is the
//! orchard's other planting direction, which is not assumed to be orthogonal.
//!
//! Both peaks are refined to the axial mean of the bearings in and next to the
//! peak bin, so a direction straddling a bin edge (or the 0/π wrap) is not
//! quantized to the edge.
//!
//! When every nearest neighbour lies along the rows (rectangular blocks whose
//! in-row spacing is strictly tighter than the row spacing), the masked
//! histogram is empty.  The secondary search then takes, for each tree, its
//! nearest other tree whose bearing lies outside the mask, however many
//! in-row neighbours are closer.  Only if no tree has one are the points
//! collinear.

use log::debug;

use og_core::angle::{axial_bearing, axial_distance, axial_mean};
use og_core::{LocalPoint, ScanConfig, ScanError, ScanResult};
use og_spatial::PointIndex;

// ── Orientation ───────────────────────────────────────────────────────────────

/// The orchard's two dominant planting directions, radians in [0, π).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Orientation {
    pub primary:   f64,
    pub secondary: f64,
}

impl Orientation {
    /// Wrap-aware angle between the two axes, in [0, π/2].
    pub fn separation(&self) -> f64 {
        axial_distance(self.primary, self.secondary)
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.1}° / {:.1}°",
            self.primary.to_degrees(),
            self.secondary.to_degrees()
        )
    }
}

// ── Bearing histogram ─────────────────────────────────────────────────────────

/// Circular histogram of axial bearings over [0, π).
///
/// Keeps the raw bearings alongside the counts so a peak can be refined
/// without re-querying the index.
struct BearingHistogram {
    counts:    Vec<u32>,
    masked:    Vec<bool>,
    bearings:  Vec<(usize, f64)>,
    bin_width: f64,
}

impl BearingHistogram {
    fn new(num_bins: usize) -> Self {
        Self {
            counts:    vec![0; num_bins],
            masked:    vec![false; num_bins],
            bearings:  Vec::new(),
            bin_width: std::f64::consts::PI / num_bins as f64,
        }
    }

    fn bin_of(&self, angle: f64) -> usize {
        ((angle / self.bin_width) as usize).min(self.counts.len() - 1)
    }

    fn accumulate(&mut self, from: LocalPoint, to: LocalPoint) {
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        if dx == 0.0 && dy == 0.0 {
            // Coincident detections carry no direction.
            return;
        }
        let bearing = axial_bearing(dx, dy);
        let bin = self.bin_of(bearing);
        self.counts[bin] += 1;
        self.bearings.push((bin, bearing));
    }

    fn total(&self) -> usize {
        self.bearings.len()
    }

    /// First bin with the highest non-zero count.
    fn peak(&self) -> Option<(usize, u32)> {
        let mut best: Option<(usize, u32)> = None;
        for (i, &c) in self.counts.iter().enumerate() {
            if c > 0 && best.is_none_or(|(_, b)| c > b) {
                best = Some((i, c));
            }
        }
        best
    }

    /// Clear every bin whose centre lies strictly within `radius` of `angle`.
    fn mask_around(&mut self, angle: f64, radius: f64) {
        for i in 0..self.counts.len() {
            let centre = (i as f64 + 0.5) * self.bin_width;
            if axial_distance(centre, angle) < radius {
                self.counts[i] = 0;
                self.masked[i] = true;
            }
        }
    }

    /// Axial mean of the unmasked bearings in `bin` and its two circular
    /// neighbours.  Falls back to the bin centre if they cancel out.
    fn refined_angle(&self, bin: usize) -> f64 {
        let n = self.counts.len();
        let near = |b: usize| {
            let d = b.abs_diff(bin);
            d.min(n - d) <= 1
        };
        axial_mean(
            self.bearings
                .iter()
                .filter(|&&(b, _)| near(b) && !self.masked[b])
                .map(|&(_, a)| a),
        )
        .unwrap_or((bin as f64 + 0.5) * self.bin_width)
    }
}

// ── Detection ─────────────────────────────────────────────────────────────────

/// Determine the two dominant planting directions of `points`.
///
/// # Errors
///
/// - [`ScanError::InsufficientData`] for fewer than two points.
/// - [`ScanError::DegenerateGeometry`] when there is no direction signal:
///   every nearest neighbour is coincident, no two bearings agree, the points
///   are collinear, or the two axes coincide.
pub fn detect_orientation(points: &[LocalPoint], config: &ScanConfig) -> ScanResult<Orientation> {
    if points.len() < 2 {
        return Err(ScanError::InsufficientData { got: points.len() });
    }

    let index = PointIndex::build(points);

    let mut hist = BearingHistogram::new(config.histogram_bins);
    for (i, &p) in points.iter().enumerate() {
        if let Some(n) = index.nearest_other(i) {
            hist.accumulate(p, points[n.idx]);
        }
    }

    if hist.total() == 0 {
        return Err(ScanError::DegenerateGeometry(
            "every tree coincides with its nearest neighbour".into(),
        ));
    }
    let Some((peak, votes)) = hist.peak() else {
        return Err(ScanError::DegenerateGeometry("empty bearing histogram".into()));
    };
    if votes < 2 {
        return Err(ScanError::DegenerateGeometry(
            "nearest-neighbour bearings are uniformly spread; no dominant direction".into(),
        ));
    }

    let primary = hist.refined_angle(peak);
    hist.mask_around(primary, config.mask_radius());

    let secondary = match hist.peak() {
        Some((bin, _)) => hist.refined_angle(bin),
        None => {
            debug!(
                "orientation: no nearest-neighbour bearing outside ±{:.1}°, searching past the rows",
                config.mask_radius_deg
            );
            let mut wide = BearingHistogram::new(config.histogram_bins);
            wide.mask_around(primary, config.mask_radius());
            for (i, &p) in points.iter().enumerate() {
                let across = index.nearest_other_where(i, |j| {
                    let (dx, dy) = (points[j].x - p.x, points[j].y - p.y);
                    (dx != 0.0 || dy != 0.0) && !wide.masked[wide.bin_of(axial_bearing(dx, dy))]
                });
                if let Some(n) = across {
                    wide.accumulate(p, points[n.idx]);
                }
            }
            let (bin, _) = wide.peak().ok_or_else(|| {
                ScanError::DegenerateGeometry(
                    "no second planting direction: points are collinear".into(),
                )
            })?;
            wide.refined_angle(bin)
        }
    };

    let orientation = Orientation { primary, secondary };
    if orientation.separation() < config.bin_width() {
        return Err(ScanError::DegenerateGeometry(format!(
            "primary and secondary axes coincide ({orientation})"
        )));
    }

    debug!(
        "orientation: {orientation} from {} bearings (peak {votes} votes)",
        hist.total()
    );
    Ok(orientation)
}
