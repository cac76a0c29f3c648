//! Synthetic orchard blocks for trying the scanner without survey data.

use std::io::Write;

use anyhow::{Result, bail};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use og_core::GeoPoint;

/// A planted grid with some interior trees removed.
pub struct SynthBlock {
    pub trees:   Vec<GeoPoint>,
    pub removed: Vec<GeoPoint>,
}

/// Plant `rows × cols` trees `spacing_deg` apart from `origin` (row step in
/// latitude, column step in longitude), then remove `remove` interior trees
/// chosen by `seed`.
pub fn planted_grid(
    rows:        usize,
    cols:        usize,
    spacing_deg: f64,
    origin:      GeoPoint,
    remove:      usize,
    seed:        u64,
) -> Result<SynthBlock> {
    if rows < 3 || cols < 3 {
        bail!("a block needs at least 3 rows and 3 columns, got {rows}×{cols}");
    }
    let interior = (rows - 2) * (cols - 2);
    if remove > interior {
        bail!("cannot remove {remove} trees: the block has {interior} interior positions");
    }

    let mut cells: Vec<(usize, usize)> = (1..rows - 1)
        .flat_map(|r| (1..cols - 1).map(move |c| (r, c)))
        .collect();
    let mut rng = SmallRng::seed_from_u64(seed);
    cells.shuffle(&mut rng);
    cells.truncate(remove);

    let at = |r: usize, c: usize| {
        GeoPoint::new(origin.lat + r as f64 * spacing_deg, origin.lon + c as f64 * spacing_deg)
    };

    let mut trees = Vec::with_capacity(rows * cols - remove);
    for r in 0..rows {
        for c in 0..cols {
            if !cells.contains(&(r, c)) {
                trees.push(at(r, c));
            }
        }
    }
    let removed = cells.iter().map(|&(r, c)| at(r, c)).collect();
    Ok(SynthBlock { trees, removed })
}

/// Write `trees` as an `id,lat,lng` CSV.
pub fn write_trees<W: Write>(sink: W, trees: &[GeoPoint]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(["id", "lat", "lng"])?;
    for (id, p) in trees.iter().enumerate() {
        writer.write_record(&[id.to_string(), p.lat.to_string(), p.lon.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}
