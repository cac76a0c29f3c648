//! Survey provider records and the missing-tree report.
//!
//! Field names follow the provider's JSON so records deserialize directly
//! from its responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use og_core::GeoPoint;
use og_scan::Solution;

// ── Provider records ──────────────────────────────────────────────────────────

/// One aerial survey of an orchard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub id:         u64,
    pub orchard_id: u64,
    /// Surveys without a date are never chosen as the latest.
    #[serde(default)]
    pub date:       Option<NaiveDate>,
    #[serde(default)]
    pub hectares:   Option<f64>,
    /// Orchard boundary as the provider encodes it (WKT-like text).
    #[serde(default)]
    pub polygon:    Option<String>,
}

/// One detected tree within a survey.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    pub id:         u64,
    pub survey_id:  u64,
    #[serde(default)]
    pub lat:        Option<f64>,
    #[serde(default)]
    pub lng:        Option<f64>,
    #[serde(default)]
    pub ndre:       Option<f64>,
    #[serde(default)]
    pub ndvi:       Option<f64>,
    #[serde(default)]
    pub volume:     Option<f64>,
    #[serde(default)]
    pub area:       Option<f64>,
    #[serde(default)]
    pub row_index:  Option<u32>,
    #[serde(default)]
    pub tree_index: Option<u32>,
}

impl TreeRecord {
    /// The tree's location, if both coordinates are present.
    pub fn location(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.lat?, self.lng?))
    }
}

/// One page of an offset/limit listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count:    u64,
    #[serde(default)]
    pub next:     Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results:  Vec<T>,
}

// ── Report ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl From<GeoPoint> for Coordinate {
    fn from(p: GeoPoint) -> Self {
        Self { lat: p.lat, lng: p.lon }
    }
}

/// Serializes as `{"missing_trees":[{"lat":..,"lng":..}, ...]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MissingTreesReport {
    pub missing_trees: Vec<Coordinate>,
}

impl MissingTreesReport {
    pub fn from_points(points: &[GeoPoint]) -> Self {
        Self { missing_trees: points.iter().copied().map(Coordinate::from).collect() }
    }

    pub fn from_solution(solution: &Solution) -> Self {
        Self::from_points(&solution.missing)
    }

    pub fn len(&self) -> usize {
        self.missing_trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missing_trees.is_empty()
    }
}
