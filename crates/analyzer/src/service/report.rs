//! Report — inputs and serializable results of one analysis request.

use serde::Serialize;

use crate::pairing::EventPair;
use crate::parser::{MetricsSnapshot, ParsedLog};
use crate::timeline::{JobEntries, TimelineEvent};

/// One job handed over by the fetching layer.
#[derive(Debug, Clone)]
pub struct JobInput {
    pub job_id: String,
    /// Full job name, used to select a parser profile
    pub name: String,
    pub log: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    Parsed(ParsedLog),
    /// Placeholder for a job whose log could not be analyzed
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobReport {
    pub job_id: String,
    pub name: String,
    pub display_name: String,
    /// Selected parser profile
    pub profile: Option<String>,
    #[serde(flatten)]
    pub outcome: JobOutcome,
}

impl JobReport {
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, JobOutcome::Failed { .. })
    }

    pub fn parsed(&self) -> Option<&ParsedLog> {
        match &self.outcome {
            JobOutcome::Parsed(parsed) => Some(parsed),
            JobOutcome::Failed { .. } => None,
        }
    }

    pub fn timeline_entries(&self) -> JobEntries<'_> {
        JobEntries {
            job_id: &self.job_id,
            entries: self.parsed().map(|p| p.entries.as_slice()).unwrap_or_default(),
            errored: self.is_failed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub jobs: Vec<JobReport>,
    pub timeline: Vec<TimelineEvent>,
    pub pairs: Vec<EventPair>,
    pub sync_event_count: usize,
    /// Legend: every configured channel type plus "exception", sorted
    pub event_types: Vec<String>,
    pub metrics: MetricsSnapshot,
}
