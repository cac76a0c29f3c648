//! `og-core` — foundational types for the `orchard_gaps` workspace.
//!
//! This crate is a dependency of every other `og-*` crate.  It intentionally
//! has no `og-*` dependencies and minimal external ones (only `thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`geo`]    | `GeoPoint`, `LocalPoint`, `GeoProjector`                  |
//! | [`angle`]  | Axial angle folding and wrap-aware differences            |
//! | [`stats`]  | `median` over unordered samples                           |
//! | [`config`] | `ScanConfig`, `DedupeStrategy`                            |
//! | [`error`]  | `ScanError`, `ScanResult`, `ScanWarning`                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on all public types; needed to   |
//! |         | load a `ScanConfig` from a JSON file.                      |

pub mod angle;
pub mod config;
pub mod error;
pub mod geo;
pub mod stats;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DedupeStrategy, ScanConfig};
pub use error::{ScanError, ScanResult, ScanWarning};
pub use geo::{EARTH_RADIUS_M, GeoPoint, GeoProjector, LocalPoint};
pub use stats::median;
