//! CSV output of a [`MissingTreesReport`].
//!
//! One `lat,lng` row per missing tree, header first.  JSON output goes
//! through `serde_json` on the report itself.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::{MissingTreesReport, SurveyResult};

/// Write `report` to a CSV file at `path`, replacing any existing file.
pub fn write_report_csv(path: &Path, report: &MissingTreesReport) -> SurveyResult<()> {
    write_report_writer(File::create(path)?, report)
}

/// Like [`write_report_csv`] but accepts any `Write` sink.
pub fn write_report_writer<W: Write>(sink: W, report: &MissingTreesReport) -> SurveyResult<()> {
    let mut writer = Writer::from_writer(sink);
    writer.write_record(["lat", "lng"])?;
    for c in &report.missing_trees {
        writer.write_record(&[c.lat.to_string(), c.lng.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}
