//! Geographic and local planar coordinates.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  Orchard rows are a few metres
//! apart, and single precision only resolves ~0.2 m at these magnitudes,
//! which is too coarse once gaps are interpolated and back-projected.
//!
//! # Projection
//!
//! [`GeoProjector`] is an equirectangular (flat-earth) projection around a
//! single reference coordinate:
//!
//! ```text
//! x = (lon - ref_lon) * cos(ref_lat) * R
//! y = (lat - ref_lat) * R
//! ```
//!
//! with angles in radians and `R` the mean Earth radius.  It is accurate at
//! orchard scale (a few kilometres) and makes no attempt beyond that.

use crate::stats::median;
use crate::{ScanError, ScanResult};

/// Mean Earth radius, metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

// ── GeoPoint ──────────────────────────────────────────────────────────────────

/// A WGS-84 geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` if both components are finite and inside the WGS-84 ranges.
    pub fn is_valid(self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.7}, {:.7})", self.lat, self.lon)
    }
}

// ── LocalPoint ────────────────────────────────────────────────────────────────

/// A point in the local planar frame, metres east (`x`) and north (`y`) of
/// the projector's reference coordinate.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalPoint {
    pub x: f64,
    pub y: f64,
}

impl LocalPoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(self, other: LocalPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Rotate counter-clockwise about the origin by `angle` radians.
    #[inline]
    pub fn rotated(self, angle: f64) -> LocalPoint {
        let (s, c) = angle.sin_cos();
        LocalPoint {
            x: self.x * c - self.y * s,
            y: self.x * s + self.y * c,
        }
    }

    /// Point at fraction `t` of the way from `self` to `other`.
    #[inline]
    pub fn lerp(self, other: LocalPoint, t: f64) -> LocalPoint {
        LocalPoint {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    #[inline]
    pub fn as_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl std::fmt::Display for LocalPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3} m, {:.3} m)", self.x, self.y)
    }
}

// ── GeoProjector ──────────────────────────────────────────────────────────────

/// Converts between [`GeoPoint`] and [`LocalPoint`] around one reference.
///
/// Built once per solve so every projected point shares the same reference
/// and relative distances stay comparable.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoProjector {
    reference: GeoPoint,
    ref_lat_rad: f64,
    ref_lon_rad: f64,
    cos_ref_lat: f64,
}

impl GeoProjector {
    /// Projector centred on an explicit reference coordinate.
    pub fn new(reference: GeoPoint) -> Self {
        let ref_lat_rad = reference.lat.to_radians();
        Self {
            reference,
            ref_lat_rad,
            ref_lon_rad: reference.lon.to_radians(),
            cos_ref_lat: ref_lat_rad.cos(),
        }
    }

    /// Projector centred on the per-axis median of `points`.
    ///
    /// The median keeps a handful of stray detections from dragging the
    /// reference away from the orchard.
    pub fn from_points(points: &[GeoPoint]) -> ScanResult<Self> {
        let mut lats: Vec<f64> = points.iter().map(|p| p.lat).collect();
        let mut lons: Vec<f64> = points.iter().map(|p| p.lon).collect();
        match (median(&mut lats), median(&mut lons)) {
            (Some(lat), Some(lon)) => Ok(Self::new(GeoPoint::new(lat, lon))),
            _ => Err(ScanError::InsufficientData { got: points.len() }),
        }
    }

    pub fn reference(&self) -> GeoPoint {
        self.reference
    }

    pub fn to_local(&self, p: GeoPoint) -> LocalPoint {
        LocalPoint {
            x: (p.lon.to_radians() - self.ref_lon_rad) * self.cos_ref_lat * EARTH_RADIUS_M,
            y: (p.lat.to_radians() - self.ref_lat_rad) * EARTH_RADIUS_M,
        }
    }

    pub fn to_geo(&self, p: LocalPoint) -> GeoPoint {
        let lat_rad = p.y / EARTH_RADIUS_M + self.ref_lat_rad;
        let lon_rad = p.x / (EARTH_RADIUS_M * self.cos_ref_lat) + self.ref_lon_rad;
        GeoPoint::new(lat_rad.to_degrees(), lon_rad.to_degrees())
    }

    pub fn project_all(&self, points: &[GeoPoint]) -> Vec<LocalPoint> {
        points.iter().map(|&p| self.to_local(p)).collect()
    }

    pub fn unproject_all(&self, points: &[LocalPoint]) -> Vec<GeoPoint> {
        points.iter().map(|&p| self.to_geo(p)).collect()
    }

    /// Diagonal of the bounding box of `points`, metres.  Zero for empty input.
    pub fn extent_m(points: &[LocalPoint]) -> f64 {
        let Some(first) = points.first() else {
            return 0.0;
        };
        let (mut min, mut max) = (*first, *first);
        for p in &points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        min.distance(max)
    }
}
