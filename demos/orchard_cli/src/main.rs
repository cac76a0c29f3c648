//! orchard-gaps — find missing trees in surveyed orchard blocks.
//!
//! ```text
//! orchard-gaps synth --rows 10 --cols 10 --remove 5 --out trees.csv
//! orchard-gaps scan trees.csv --json missing.json --csv missing.csv
//! orchard-gaps analyze 216269 --surveys surveys.json --trees trees.json
//! ```
//!
//! Set `RUST_LOG=debug` to follow each phase of the solve.

mod synth;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use og_core::{GeoPoint, ScanConfig, ScanWarning};
use og_scan::{AxisScan, OrchardScanner, ScanObserver};
use og_survey::{MemorySource, MissingTreesReport, analyze_orchard, load_trees_csv, write_report_csv};

use synth::{planted_grid, write_trees};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "orchard-gaps")]
#[command(about = "Infer missing trees from surveyed orchard tree locations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a `lat,lng` CSV of tree locations.
    Scan {
        /// Tree locations (CSV with `lat` and `lng` columns).
        trees: PathBuf,

        /// Scanner configuration (JSON); omitted fields keep their defaults.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the missing-tree report as JSON.
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write the missing-tree report as `lat,lng` CSV.
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Analyse the latest survey of an orchard from exported provider JSON.
    Analyze {
        orchard_id: u64,

        /// JSON array of surveys.
        #[arg(long)]
        surveys: PathBuf,

        /// JSON array of tree records.
        #[arg(long)]
        trees: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write a synthetic planted block with random interior trees removed.
    Synth {
        #[arg(long, default_value_t = 10)]
        rows: usize,

        #[arg(long, default_value_t = 10)]
        cols: usize,

        /// Tree spacing in degrees, applied to both latitude and longitude.
        #[arg(long, default_value_t = 0.0002)]
        spacing_deg: f64,

        #[arg(long, default_value_t = -32.328, allow_negative_numbers = true)]
        origin_lat: f64,

        #[arg(long, default_value_t = 18.826, allow_negative_numbers = true)]
        origin_lon: f64,

        /// Number of interior trees to remove.
        #[arg(long, default_value_t = 5)]
        remove: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output CSV; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Keeps per-axis statistics for the summary table.
#[derive(Default)]
struct AxisSummary {
    axes:     Vec<(f64, usize, usize, usize)>,
    warnings: Vec<String>,
}

impl ScanObserver for AxisSummary {
    fn on_axis_scanned(&mut self, scan: &AxisScan) {
        self.axes.push((scan.angle.to_degrees(), scan.rows, scan.gaps.len(), scan.candidates.len()));
    }

    fn on_warning(&mut self, warning: &ScanWarning) {
        self.warnings.push(warning.to_string());
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn load_config(path: Option<&Path>) -> Result<ScanConfig> {
    let Some(path) = path else {
        return Ok(ScanConfig::default());
    };
    let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let config: ScanConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn run_scan(trees_path: &Path, config: Option<&Path>, json: Option<&Path>, csv: Option<&Path>) -> Result<()> {
    let scanner = OrchardScanner::new(load_config(config)?);
    let trees = load_trees_csv(trees_path)
        .with_context(|| format!("loading trees from {}", trees_path.display()))?;
    println!("Loaded {} trees from {}", trees.len(), trees_path.display());

    let mut summary = AxisSummary::default();
    let t0 = Instant::now();
    let solution = scanner.solve_with_observer(&trees, &mut summary)?;
    let elapsed = t0.elapsed();

    println!("Solved in {:.3} ms", elapsed.as_secs_f64() * 1_000.0);
    println!("  reference       : {}", solution.reference);
    println!("  axes            : {}", solution.orientation);
    if let Some(tol) = solution.merge_tolerance_m {
        println!("  merge tolerance : {tol:.2} m");
    }
    println!();

    println!("{:<10} {:>6} {:>6} {:>11}", "Axis (°)", "Rows", "Gaps", "Candidates");
    println!("{}", "-".repeat(36));
    for (angle, rows, gaps, candidates) in &summary.axes {
        println!("{angle:<10.1} {rows:>6} {gaps:>6} {candidates:>11}");
    }
    println!();

    for w in &summary.warnings {
        println!("warning: {w}");
    }
    println!("Missing trees: {}", solution.len());
    for p in &solution.missing {
        println!("  {p}");
    }

    let report = MissingTreesReport::from_solution(&solution);
    if let Some(path) = json {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &report)?;
        println!("Wrote {}", path.display());
    }
    if let Some(path) = csv {
        write_report_csv(path, &report).with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn run_analyze(orchard_id: u64, surveys: &Path, trees: &Path, config: Option<&Path>) -> Result<()> {
    let scanner = OrchardScanner::new(load_config(config)?);
    let source = MemorySource::from_json_files(surveys, trees).context("loading provider export")?;
    log::info!("{} surveys, {} tree records", source.survey_count(), source.tree_count());

    match analyze_orchard(&source, orchard_id, &scanner) {
        Ok(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {e}", e.status_code());
            std::process::exit(1);
        }
    }
}

fn run_synth(
    rows:        usize,
    cols:        usize,
    spacing_deg: f64,
    origin:      GeoPoint,
    remove:      usize,
    seed:        u64,
    out:         Option<&Path>,
) -> Result<()> {
    let block = planted_grid(rows, cols, spacing_deg, origin, remove, seed)?;
    match out {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_trees(BufWriter::new(file), &block.trees)?;
            println!("Wrote {} trees to {}", block.trees.len(), path.display());
            println!("Removed ({}):", block.removed.len());
            for p in &block.removed {
                println!("  {p}");
            }
        }
        None => write_trees(std::io::stdout().lock(), &block.trees)?,
    }
    Ok(())
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Commands::Scan { trees, config, json, csv } => {
            run_scan(&trees, config.as_deref(), json.as_deref(), csv.as_deref())
        }
        Commands::Analyze { orchard_id, surveys, trees, config } => {
            run_analyze(orchard_id, &surveys, &trees, config.as_deref())
        }
        Commands::Synth { rows, cols, spacing_deg, origin_lat, origin_lon, remove, seed, out } => run_synth(
            rows,
            cols,
            spacing_deg,
            GeoPoint::new(origin_lat, origin_lon),
            remove,
            seed,
            out.as_deref(),
        ),
    }
}
