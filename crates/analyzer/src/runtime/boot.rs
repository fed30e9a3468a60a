//! Boot — logging init, config load, parser compilation.

use std::path::Path;
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::{ConfigError, EngineConfig};
use crate::service::AnalysisService;

/// Initialise the tracing / logging subsystem.
///
/// Logs go to stderr; stdout carries the JSON report.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "analyzer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load and compile the configuration, and build the analysis service.
pub fn boot(config_path: Option<&Path>) -> Result<AnalysisService, ConfigError> {
    let config = EngineConfig::load(config_path)?;

    let parsers = config.compile().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;
    info!(
        "Loaded {} parser profile(s) with {} channel(s)",
        parsers.profiles.len(),
        parsers.profiles.iter().map(|p| p.channels.len()).sum::<usize>()
    );

    Ok(AnalysisService::new(Arc::new(parsers)))
}
