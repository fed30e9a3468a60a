//! Run — read job logs, analyze them, print the report.

use std::io::Write;

use tracing::info;

use crate::service::{AnalysisService, JobInput};
use super::cli::Cli;

pub async fn run(service: &AnalysisService, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut jobs = Vec::with_capacity(cli.jobs.len());
    for (job_id, path) in &cli.jobs {
        let log = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read log for job {} from {}: {}", job_id, path, e))?;
        info!(job_id = %job_id, bytes = log.len(), "Read job log");

        jobs.push(JobInput {
            job_id: job_id.clone(),
            name: cli.job_name(job_id).to_string(),
            log,
        });
    }

    let report = service.analyze(jobs).await;

    let mut stdout = std::io::stdout().lock();
    if cli.compact {
        serde_json::to_writer(&mut stdout, &report)?;
    } else {
        serde_json::to_writer_pretty(&mut stdout, &report)?;
    }
    writeln!(stdout)?;
    Ok(())
}
