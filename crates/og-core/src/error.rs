//! Scan error and diagnostic types.
//!
//! Errors are fatal for one `solve` call; warnings are values carried in the
//! result so the caller decides what to do with them.  Nothing here is
//! transient, so nothing is ever retried.

use thiserror::Error;

/// The error type shared by every `og-*` crate that touches the scan core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScanError {
    #[error("insufficient data: need at least 2 tree locations, got {got}")]
    InsufficientData { got: usize },

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("invalid coordinate at input index {index}")]
    InvalidCoordinate { index: usize },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for the scan core.
pub type ScanResult<T> = Result<T, ScanError>;

/// A non-fatal diagnostic raised while solving.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScanWarning {
    /// The input extent is large enough that the flat-earth projection may
    /// distort spacing noticeably.
    ProjectionRange { extent_m: f64, limit_m: f64 },
}

impl std::fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanWarning::ProjectionRange { extent_m, limit_m } => write!(
                f,
                "input extent {extent_m:.0} m exceeds {limit_m:.0} m; local projection error may be significant"
            ),
        }
    }
}
