use std::sync::atomic::{AtomicU64, Ordering};
use serde::Serialize;

use super::model::ParsedLog;

/// Counters shared by concurrently running per-job parses.
///
/// All operations use `Ordering::Relaxed`: these are diagnostics, and a
/// snapshot taken while parses are in flight may be slightly torn.
#[derive(Debug, Default)]
pub struct ParsingMetrics {
    jobs_parsed: AtomicU64,
    jobs_failed: AtomicU64,
    lines: AtomicU64,
    matches: AtomicU64,
    exceptions: AtomicU64,
    time_nanos: AtomicU64,
}

impl ParsingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful job parse
    #[inline]
    pub fn record_parse(&self, parsed: &ParsedLog, time_nanos: u64) {
        let exceptions = parsed.entries.iter().filter(|e| e.is_exception()).count();

        self.jobs_parsed.fetch_add(1, Ordering::Relaxed);
        self.lines.fetch_add(parsed.line_count as u64, Ordering::Relaxed);
        self.matches.fetch_add(parsed.match_count as u64, Ordering::Relaxed);
        self.exceptions.fetch_add(exceptions as u64, Ordering::Relaxed);
        self.time_nanos.fetch_add(time_nanos, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_failure(&self) {
        self.jobs_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let jobs_parsed = self.jobs_parsed.load(Ordering::Relaxed);
        let jobs_failed = self.jobs_failed.load(Ordering::Relaxed);
        let time_nanos = self.time_nanos.load(Ordering::Relaxed);
        let attempts = jobs_parsed + jobs_failed;

        MetricsSnapshot {
            jobs_parsed,
            jobs_failed,
            lines_processed: self.lines.load(Ordering::Relaxed),
            entries_matched: self.matches.load(Ordering::Relaxed),
            exceptions_synthesized: self.exceptions.load(Ordering::Relaxed),
            avg_parse_time_us: if jobs_parsed > 0 {
                (time_nanos as f64 / jobs_parsed as f64) / 1000.0
            } else {
                0.0
            },
            success_rate: if attempts > 0 {
                jobs_parsed as f64 / attempts as f64
            } else {
                1.0
            },
        }
    }
}

/// A read-only, serializable view of [`ParsingMetrics`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub jobs_parsed: u64,
    pub jobs_failed: u64,
    pub lines_processed: u64,
    pub entries_matched: u64,
    pub exceptions_synthesized: u64,
    pub avg_parse_time_us: f64,
    pub success_rate: f64,
}
