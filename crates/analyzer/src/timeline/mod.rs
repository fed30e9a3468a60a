//! Timeline — merges per-job entry lists into one chronological sequence.

use serde::Serialize;

use crate::parser::LogEntry;

/// One job's contribution to the merge.
#[derive(Debug, Clone, Copy)]
pub struct JobEntries<'a> {
    pub job_id: &'a str,
    pub entries: &'a [LogEntry],
    /// Jobs that failed to fetch or parse contribute nothing
    pub errored: bool,
}

/// A log entry placed on the global timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEvent {
    pub job_id: String,
    /// Position of the entry within its job's own entry list (0-based)
    pub log_index: usize,
    #[serde(flatten)]
    pub entry: LogEntry,
}

impl TimelineEvent {
    /// Always present: untimed entries never reach the timeline.
    pub fn timestamp(&self) -> &str {
        self.entry.timestamp.as_deref().unwrap_or_default()
    }

    pub fn event_name(&self) -> Option<&str> {
        self.entry.event_name.as_deref()
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.entry.field(name)
    }
}

/// Build the global timeline.
///
/// Entries without a timestamp are dropped, and so is every entry of an
/// errored job. The result is stably sorted by the raw timestamp text, so
/// entries sharing a timestamp keep job iteration order, then log order.
/// Lexical order equals chronological order because all timestamps share one
/// fixed-width ISO-8601 shape.
pub fn assemble<'a, I>(jobs: I) -> Vec<TimelineEvent>
where
    I: IntoIterator<Item = JobEntries<'a>>,
{
    let mut timeline: Vec<TimelineEvent> = jobs
        .into_iter()
        .filter(|job| !job.errored)
        .flat_map(|job| {
            job.entries
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.timestamp.is_some())
                .map(move |(log_index, entry)| TimelineEvent {
                    job_id: job.job_id.to_string(),
                    log_index,
                    entry: entry.clone(),
                })
        })
        .collect();

    timeline.sort_by(|a, b| a.timestamp().cmp(b.timestamp()));
    timeline
}
