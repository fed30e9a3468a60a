/// Log classification and exception aggregation
///
/// Turns one job's raw, line-oriented test-runner log into an ordered list
/// of structured entries.
///
/// # Architecture
///
/// - `classify.rs`: timestamp prefix detection and first-match-wins channel classification
/// - `exception.rs`: buffering of non-timestamped runs into synthetic exception entries
/// - `job.rs`: the per-job driver tying both together
/// - `model.rs`: channels, profiles, entries and parse errors
/// - `metrics.rs`: parse counters shared across concurrently parsed jobs

pub mod classify;
pub mod exception;
pub mod job;
pub mod metrics;
pub mod model;
mod serde_utils;

// Re-export commonly used types
pub use job::parse_job_log;
pub use metrics::{MetricsSnapshot, ParsingMetrics};
pub use model::{
    Channel, LineFault, LinePatterns, LogEntry, ParseError, ParsedLog, ParserProfile,
    TimestampError, EXCEPTION_TYPE,
};
