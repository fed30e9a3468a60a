//! Service module — end-to-end analysis of a set of jobs.

pub mod analyze;
pub mod report;

pub use analyze::AnalysisService;
pub use report::{AnalysisReport, JobInput, JobOutcome, JobReport};
