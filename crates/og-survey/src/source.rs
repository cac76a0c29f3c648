//! Survey providers and offset/limit pagination.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use og_core::GeoPoint;

use crate::model::{Page, Survey, TreeRecord};
use crate::SurveyResult;

/// Page size used when listing an orchard's surveys.
pub const SURVEY_PAGE_LIMIT: usize = 100;

/// Page size used when listing a survey's trees.
pub const TREE_PAGE_LIMIT: usize = 500;

// ── SurveySource ──────────────────────────────────────────────────────────────

/// A provider of surveys and their tree records, one page at a time.
///
/// Implementations report transport and provider failures as
/// [`SurveyError::Upstream`](crate::SurveyError::Upstream); callers do not
/// retry.
pub trait SurveySource {
    fn surveys(&self, orchard_id: u64, limit: usize, offset: usize) -> SurveyResult<Page<Survey>>;

    fn tree_records(&self, survey_id: u64, limit: usize, offset: usize) -> SurveyResult<Page<TreeRecord>>;
}

// ── Pagination ────────────────────────────────────────────────────────────────

/// Walk an offset/limit listing until an empty or short page.
fn collect_pages<T, F>(limit: usize, mut fetch: F) -> SurveyResult<Vec<T>>
where
    F: FnMut(usize, usize) -> SurveyResult<Page<T>>,
{
    let mut items = Vec::new();
    let mut offset = 0;
    loop {
        let page = fetch(limit, offset)?;
        let n = page.results.len();
        if n == 0 {
            break;
        }
        items.extend(page.results);
        if n < limit {
            break;
        }
        offset += limit;
    }
    Ok(items)
}

/// Every survey of `orchard_id`, in provider order.
pub fn fetch_all_surveys<S: SurveySource + ?Sized>(source: &S, orchard_id: u64) -> SurveyResult<Vec<Survey>> {
    let surveys = collect_pages(SURVEY_PAGE_LIMIT, |limit, offset| {
        source.surveys(orchard_id, limit, offset)
    })?;
    debug!("orchard {orchard_id}: {} surveys", surveys.len());
    Ok(surveys)
}

/// The most recently dated survey of `orchard_id`.
///
/// Undated surveys are ignored.  Returns `Ok(None)` when no survey
/// qualifies.
pub fn latest_survey<S: SurveySource + ?Sized>(source: &S, orchard_id: u64) -> SurveyResult<Option<Survey>> {
    let surveys = fetch_all_surveys(source, orchard_id)?;
    Ok(most_recent(&surveys).cloned())
}

/// The most recently dated survey in `surveys`; the first listed wins a tie.
pub fn most_recent(surveys: &[Survey]) -> Option<&Survey> {
    surveys
        .iter()
        .rev()
        .filter(|s| s.date.is_some())
        .max_by_key(|s| s.date)
}

/// Locations of every tree in `survey_id` that has both coordinates.
pub fn fetch_tree_locations<S: SurveySource + ?Sized>(source: &S, survey_id: u64) -> SurveyResult<Vec<GeoPoint>> {
    let records = collect_pages(TREE_PAGE_LIMIT, |limit, offset| {
        source.tree_records(survey_id, limit, offset)
    })?;
    let total = records.len();
    let trees: Vec<GeoPoint> = records.iter().filter_map(TreeRecord::location).collect();
    debug!(
        "survey {survey_id}: {} trees located ({} without coordinates)",
        trees.len(),
        total - trees.len()
    );
    Ok(trees)
}

// ── MemorySource ──────────────────────────────────────────────────────────────

/// A [`SurveySource`] over records held in memory.
///
/// Serves the same offset/limit pages a remote provider would, so the
/// pagination helpers behave identically against it.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    surveys: Vec<Survey>,
    trees:   Vec<TreeRecord>,
}

impl MemorySource {
    pub fn new(surveys: Vec<Survey>, trees: Vec<TreeRecord>) -> Self {
        Self { surveys, trees }
    }

    /// Load from two JSON arrays: surveys and tree records.
    pub fn from_json_readers<R1: Read, R2: Read>(surveys: R1, trees: R2) -> SurveyResult<Self> {
        Ok(Self {
            surveys: serde_json::from_reader(surveys)?,
            trees:   serde_json::from_reader(trees)?,
        })
    }

    /// Like [`from_json_readers`](Self::from_json_readers) but reads files.
    pub fn from_json_files(surveys: &Path, trees: &Path) -> SurveyResult<Self> {
        Self::from_json_readers(
            BufReader::new(File::open(surveys)?),
            BufReader::new(File::open(trees)?),
        )
    }

    pub fn survey_count(&self) -> usize {
        self.surveys.len()
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}

impl SurveySource for MemorySource {
    fn surveys(&self, orchard_id: u64, limit: usize, offset: usize) -> SurveyResult<Page<Survey>> {
        let matching: Vec<&Survey> = self.surveys.iter().filter(|s| s.orchard_id == orchard_id).collect();
        Ok(page_of(&matching, limit, offset))
    }

    fn tree_records(&self, survey_id: u64, limit: usize, offset: usize) -> SurveyResult<Page<TreeRecord>> {
        let matching: Vec<&TreeRecord> = self.trees.iter().filter(|t| t.survey_id == survey_id).collect();
        Ok(page_of(&matching, limit, offset))
    }
}

fn page_of<T: Clone>(items: &[&T], limit: usize, offset: usize) -> Page<T> {
    let start = offset.min(items.len());
    let end = offset.saturating_add(limit).min(items.len());
    Page {
        count:    items.len() as u64,
        next:     (end < items.len()).then(|| format!("?limit={limit}&offset={end}")),
        previous: (start > 0).then(|| format!("?limit={limit}&offset={}", start.saturating_sub(limit))),
        results:  items[start..end].iter().map(|&t| t.clone()).collect(),
    }
}
