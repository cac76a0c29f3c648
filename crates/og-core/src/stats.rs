//! Small statistics helpers.

/// Median of `values`, reordering the slice in place.
///
/// Even-length input averages the two middle values.  Returns `None` for an
/// empty slice.  NaNs sort last under `total_cmp` and are the caller's
/// problem; the scan core never produces them from valid input.
pub fn median(values: &mut [f64]) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    values.sort_unstable_by(f64::total_cmp);
    let mid = n / 2;
    if n % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) * 0.5)
    }
}
