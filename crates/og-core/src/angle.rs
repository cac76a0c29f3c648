//! Axial angles.
//!
//! A planting direction has no "forward": bearings θ and θ + π describe the
//! same row.  Every angle in the workspace is therefore kept in [0, π) and
//! compared with [`axial_distance`], which treats 0 and π as neighbours.

use std::f64::consts::{FRAC_PI_2, PI};

/// Fold any angle into [0, π).
#[inline]
pub fn fold_axial(angle: f64) -> f64 {
    let folded = angle.rem_euclid(PI);
    // rem_euclid can round up to exactly π for tiny negative inputs.
    if folded >= PI { 0.0 } else { folded }
}

/// Undirected bearing from `(0, 0)` towards `(dx, dy)`, in [0, π).
#[inline]
pub fn axial_bearing(dx: f64, dy: f64) -> f64 {
    fold_axial(dy.atan2(dx))
}

/// Smallest difference between two axial angles, in [0, π/2].
#[inline]
pub fn axial_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs().rem_euclid(PI);
    if diff > FRAC_PI_2 { PI - diff } else { diff }
}

/// Mean direction of a set of axial angles.
///
/// Angles are doubled so θ and θ + π coincide, averaged as unit vectors, and
/// halved back.  Returns `None` when the set is empty or the directions
/// cancel out.
pub fn axial_mean(angles: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (mut s, mut c) = (0.0f64, 0.0f64);
    for a in angles {
        let (sin, cos) = (2.0 * a).sin_cos();
        s += sin;
        c += cos;
    }
    if s.hypot(c) <= f64::EPSILON {
        return None;
    }
    Some(fold_axial(s.atan2(c) * 0.5))
}
