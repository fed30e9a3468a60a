//! Cli — command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Reconstruct mutex and barrier timelines from test-runner logs.
#[derive(Debug, Parser)]
#[command(name = "analyzer", version)]
pub struct Cli {
    /// Configuration file [default: $ANALYZER_CONFIG_FILE or ./analyzer.toml]
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Full job name used for profile selection [default: the job id]
    #[arg(short, long = "name", value_name = "ID=NAME", value_parser = parse_key_val)]
    pub names: Vec<(String, String)>,

    /// Print the report on a single line
    #[arg(long)]
    pub compact: bool,

    /// Job log file to analyze
    #[arg(value_name = "ID=PATH", required = true, value_parser = parse_key_val)]
    pub jobs: Vec<(String, String)>,
}

impl Cli {
    pub fn job_name<'a>(&'a self, job_id: &'a str) -> &'a str {
        self.names
            .iter()
            .rev()
            .find(|(id, _)| id == job_id)
            .map(|(_, name)| name.as_str())
            .unwrap_or(job_id)
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("missing key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}
