use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use super::serde_utils::serialize_fields_as_map;

/// Category assigned to synthesized multi-line error entries.
pub const EXCEPTION_TYPE: &str = "exception";

/// One recognizable log-line shape.
///
/// Channels are data, not behavior: a profile holds them in priority order
/// and the first one whose pattern matches a line wins.
#[derive(Debug, Clone)]
pub struct Channel {
    /// Classification label copied into `LogEntry::event_name`
    pub name: String,
    /// Category copied into `LogEntry::entry_type` (e.g. "mutex", "barrier")
    pub kind: String,
    pub pattern: Regex,
}

impl Channel {
    pub fn new(name: impl Into<String>, kind: impl Into<String>, pattern: Regex) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            pattern,
        }
    }
}

/// A named bundle of channels, selected by matching a job's full name.
///
/// `match_name` is guaranteed (at configuration load) to contain a capture
/// group called `name`.
#[derive(Debug, Clone)]
pub struct ParserProfile {
    pub name: String,
    pub match_name: Regex,
    pub channels: Vec<Channel>,
}

impl ParserProfile {
    pub fn matches(&self, job_name: &str) -> bool {
        self.match_name.is_match(job_name)
    }

    /// Short job name extracted through the `name` capture group.
    pub fn short_name<'a>(&self, job_name: &'a str) -> Option<&'a str> {
        self.match_name
            .captures(job_name)
            .and_then(|caps| caps.name("name"))
            .map(|m| m.as_str())
    }
}

/// Line-level patterns shared by every profile.
#[derive(Debug, Clone)]
pub struct LinePatterns {
    /// Anchored at line start; group 1 is the timestamp value.
    pub timestamp: Regex,
    /// Inline stack-trace marker searched in buffered non-timestamped blocks.
    pub exception: Regex,
}

/// The atomic output unit of a per-job parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// ISO-8601 text. Absent only for an exception seen before any timestamp.
    pub timestamp: Option<String>,

    pub message: String,

    /// Owning channel type, or [`EXCEPTION_TYPE`]
    #[serde(rename = "type")]
    pub entry_type: String,

    /// Matching channel name, absent for exceptions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,

    /// Named capture groups of the matching channel, in pattern order.
    /// Groups that did not take part in the match are kept, unset.
    #[serde(serialize_with = "serialize_fields_as_map")]
    pub fields: Vec<(String, Option<String>)>,
}

impl LogEntry {
    pub fn exception(timestamp: Option<String>, message: String) -> Self {
        Self {
            timestamp,
            message,
            entry_type: EXCEPTION_TYPE.to_string(),
            event_name: None,
            fields: Vec::new(),
        }
    }

    /// Look up an extra field (e.g. `mutex`, `barrier`) by capture-group name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn is_exception(&self) -> bool {
        self.entry_type == EXCEPTION_TYPE
    }
}

/// Result of parsing one job's complete log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedLog {
    /// Classified lines and exception blocks, in file order
    pub entries: Vec<LogEntry>,
    /// Sorted, de-duplicated names of every extra field seen
    pub optional_columns: Vec<String>,
    pub line_count: usize,
    pub match_count: usize,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("Invalid timestamp: {0:?}")]
    Invalid(String),
}

/// What went wrong on a specific line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LineFault {
    #[error("cannot place exception block: {0}")]
    Timestamp(#[from] TimestampError),
}

/// A per-job parse failure. Callers isolate it to the failing job.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Log parsing failed at line {line_number}: '{line}'")]
    Line {
        /// 1-based; one past the last line when the fault surfaced at end of input
        line_number: usize,
        /// Offending line, or "end of file"
        line: String,
        #[source]
        source: LineFault,
    },
}
