//! `og-survey` — the survey side of `orchard_gaps`.
//!
//! Everything between an orchard identifier and a missing-tree report:
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`model`]   | `Survey`, `TreeRecord`, `Page<T>`, `MissingTreesReport`     |
//! | [`source`]  | `SurveySource` trait, pagination helpers, `MemorySource`    |
//! | [`loader`]  | `lat,lng` CSV tree loader                                   |
//! | [`report`]  | CSV report writer                                           |
//! | [`analyze`] | `analyze_orchard`: latest survey → trees → solve → report   |
//! | [`error`]   | `SurveyError`, `AnalysisError` and its status mapping       |
//!
//! # Usage
//!
//! ```rust,ignore
//! use og_scan::OrchardScanner;
//! use og_survey::{MemorySource, analyze_orchard};
//!
//! let source = MemorySource::from_json_files(&surveys_path, &trees_path)?;
//! match analyze_orchard(&source, 216_269, &OrchardScanner::default()) {
//!     Ok(report) => println!("{}", serde_json::to_string(&report)?),
//!     Err(e)     => eprintln!("{} {e}", e.status_code()),
//! }
//! ```

pub mod analyze;
pub mod error;
pub mod loader;
pub mod model;
pub mod report;
pub mod source;


pub use analyze::analyze_orchard;
pub use error::{AnalysisError, SurveyError, SurveyResult};
pub use loader::{load_trees_csv, load_trees_reader};
pub use model::{Coordinate, MissingTreesReport, Page, Survey, TreeRecord};
pub use report::{write_report_csv, write_report_writer};
pub use source::{
    MemorySource, SURVEY_PAGE_LIMIT, SurveySource, TREE_PAGE_LIMIT, fetch_all_surveys,
    fetch_tree_locations, latest_survey, most_recent,
};
