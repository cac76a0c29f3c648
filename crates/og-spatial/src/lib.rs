//! `og-spatial` — spatial indexing over local planar points.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                |
//! |-----------|---------------------------------------------------------|
//! | [`index`] | `PointIndex` (R-tree), `Neighbor`                       |
//!
//! Every scan phase builds its own [`PointIndex`] and drops it when done.
//! Indexes are never shared between phases or between solves.

pub mod index;


pub use index::{Neighbor, PointIndex};
