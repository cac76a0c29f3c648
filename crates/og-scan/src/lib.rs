//! `og-scan` — dual-axis missing-tree scanner.
//!
//! # Solve pipeline
//!
//! ```text
//! solve(trees):
//!   ① Project      — median-referenced local metres (GeoProjector).
//!   ② Orientation  — primary/secondary planting axes from the histogram of
//!                    nearest-neighbour bearings.
//!   ③ Axis scans   — one per axis: rotate, split rows, flag spacing gaps,
//!                    interpolate missing positions, rotate back.
//!   ④ Deduplicate  — merge candidates found by both scans, tolerance
//!                    0.4 × median tree spacing.
//!   ⑤ Unproject    — back to latitude/longitude.
//! ```
//!
//! Every threshold derives from the current input's own spacing, and every
//! spatial index is built and dropped inside the phase that needs it.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the two axis scans of one solve on Rayon.         |
//! | `serde`    | Derives `Serialize`/`Deserialize` on result types.     |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use og_scan::OrchardScanner;
//!
//! let solution = OrchardScanner::default().solve(&trees)?;
//! for p in &solution.missing {
//!     println!("{p}");
//! }
//! ```

pub mod axis;
pub mod dedupe;
pub mod observer;
pub mod orientation;
pub mod scanner;

#[cfg(test)]
mod tests;

pub use axis::{AxisScan, Gap, Row, scan_axis, split_rows};
pub use dedupe::dedupe;
pub use observer::{NoopObserver, ScanObserver};
pub use orientation::{Orientation, detect_orientation};
pub use scanner::{OrchardScanner, Solution};
