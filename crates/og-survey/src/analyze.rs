//! Orchard analysis: latest survey, its trees, one solve.

use log::{error, info};

use og_scan::OrchardScanner;

use crate::source::{SurveySource, fetch_tree_locations, latest_survey};
use crate::{AnalysisError, MissingTreesReport};

/// Find the missing trees of `orchard_id` in its most recent survey.
///
/// A survey with no located trees yields an empty report.
///
/// # Errors
///
/// - [`AnalysisError::NotFound`] when the orchard has no dated survey.
/// - [`AnalysisError::Upstream`] when `source` fails.
/// - [`AnalysisError::Analysis`] when the solve fails.
pub fn analyze_orchard<S: SurveySource + ?Sized>(
    source:     &S,
    orchard_id: u64,
    scanner:    &OrchardScanner,
) -> Result<MissingTreesReport, AnalysisError> {
    info!("analysing orchard {orchard_id}");

    let survey = latest_survey(source, orchard_id)
        .inspect_err(|e| error!("failed to fetch surveys for orchard {orchard_id}: {e}"))?
        .ok_or(AnalysisError::NotFound { orchard_id })?;

    let trees = fetch_tree_locations(source, survey.id)
        .inspect_err(|e| error!("failed to fetch trees for survey {}: {e}", survey.id))?;
    if trees.is_empty() {
        return Ok(MissingTreesReport::default());
    }

    let solution = scanner
        .solve(&trees)
        .inspect_err(|e| error!("analysis failed for orchard {orchard_id}: {e}"))?;
    info!(
        "orchard {orchard_id}, survey {}: {} trees, {} missing",
        survey.id,
        trees.len(),
        solution.len()
    );
    Ok(MissingTreesReport::from_solution(&solution))
}
