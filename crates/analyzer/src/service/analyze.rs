use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::conf::ParserSet;
use crate::pairing::{self, PairingResult};
use crate::parser::{parse_job_log, ParseError, ParsedLog, ParsingMetrics};
use crate::timeline;

use super::report::{AnalysisReport, JobInput, JobOutcome, JobReport};

/// Runs the whole pipeline for a set of related jobs:
/// per-job parsing (in parallel), timeline merge, then pair matching.
pub struct AnalysisService {
    parsers: Arc<ParserSet>,
}

impl AnalysisService {
    pub fn new(parsers: Arc<ParserSet>) -> Self {
        Self { parsers }
    }

    /// Analyze `jobs`.
    ///
    /// Each job is parsed on the blocking pool with its own state. A job that
    /// fails (no matching profile, parse error, crashed task) is reported as
    /// failed and left out of the timeline; the other jobs are unaffected.
    pub async fn analyze(&self, jobs: Vec<JobInput>) -> AnalysisReport {
        let metrics = Arc::new(ParsingMetrics::new());
        info!(jobs = jobs.len(), "Starting log analysis");

        let mut pending = Vec::with_capacity(jobs.len());
        for JobInput { job_id, name, log } in jobs {
            let display_name = self.parsers.display_name(&name);
            let profile = self.parsers.profiles.iter().position(|p| p.matches(&name));

            let task = profile.map(|index| {
                let parsers = Arc::clone(&self.parsers);
                let metrics = Arc::clone(&metrics);
                tokio::task::spawn_blocking(move || parse_timed(&parsers, index, &log, &metrics))
            });

            let report = JobReport {
                profile: profile.map(|index| self.parsers.profiles[index].name.clone()),
                job_id,
                name,
                display_name,
                outcome: JobOutcome::Failed { error: String::new() },
            };
            pending.push((report, task));
        }

        // Join point: the merge needs every job's result.
        let mut reports = Vec::with_capacity(pending.len());
        for (mut report, task) in pending {
            report.outcome = match task {
                None => JobOutcome::Failed {
                    error: format!("No parser profile matches job name '{}'", report.name),
                },
                Some(handle) => match handle.await {
                    Ok(Ok(parsed)) => JobOutcome::Parsed(parsed),
                    Ok(Err(e)) => JobOutcome::Failed { error: e.to_string() },
                    Err(e) => JobOutcome::Failed {
                        error: format!("Log parsing task failed: {}", e),
                    },
                },
            };

            if let JobOutcome::Failed { error } = &report.outcome {
                metrics.record_failure();
                warn!(job_id = %report.job_id, "Job log analysis failed: {}", error);
            }
            reports.push(report);
        }

        let timeline = timeline::assemble(reports.iter().map(JobReport::timeline_entries));
        let PairingResult { pairs, sync_event_count } = pairing::find_pairs(&timeline);

        info!(
            timeline_events = timeline.len(),
            pairs = pairs.len(),
            sync_event_count,
            "Log analysis complete"
        );

        AnalysisReport {
            jobs: reports,
            timeline,
            pairs,
            sync_event_count,
            event_types: self.parsers.event_types(),
            metrics: metrics.snapshot(),
        }
    }
}

fn parse_timed(
    parsers: &ParserSet,
    profile_index: usize,
    log: &str,
    metrics: &ParsingMetrics,
) -> Result<ParsedLog, ParseError> {
    let profile = &parsers.profiles[profile_index];
    let start = Instant::now();
    let parsed = parse_job_log(log, &profile.channels, &parsers.patterns)?;
    let elapsed = u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX);

    metrics.record_parse(&parsed, elapsed);
    debug!(
        profile = %profile.name,
        line_count = parsed.line_count,
        match_count = parsed.match_count,
        "Parsed job log"
    );
    Ok(parsed)
}
