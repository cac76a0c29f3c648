//! CSV tree loader.
//!
//! # CSV format
//!
//! One row per tree, with a header.  Only `lat` and `lng` are read (`lon`
//! is accepted for `lng`); other columns are ignored.
//!
//! ```csv
//! id,lat,lng,ndvi
//! 1,-32.3280,18.8260,0.71
//! 2,-32.3280,18.8262,0.69
//! 3,,,0.12
//! ```
//!
//! Rows with a blank coordinate are skipped, as the provider does for trees
//! it could not locate.

use std::io::Read;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use og_core::GeoPoint;

use crate::SurveyResult;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TreeRow {
    lat: Option<f64>,
    #[serde(alias = "lon")]
    lng: Option<f64>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load tree locations from a CSV file.
pub fn load_trees_csv(path: &Path) -> SurveyResult<Vec<GeoPoint>> {
    let file = std::fs::File::open(path)?;
    load_trees_reader(file)
}

/// Like [`load_trees_csv`] but accepts any `Read` source.
pub fn load_trees_reader<R: Read>(reader: R) -> SurveyResult<Vec<GeoPoint>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut trees = Vec::new();
    let mut skipped = 0usize;
    for result in csv_reader.deserialize::<TreeRow>() {
        let row = result?;
        match (row.lat, row.lng) {
            (Some(lat), Some(lng)) => trees.push(GeoPoint::new(lat, lng)),
            _ => skipped += 1,
        }
    }
    debug!("loaded {} trees ({skipped} rows without coordinates)", trees.len());
    Ok(trees)
}
