//! Compile — validates an [`EngineConfig`] and pre-compiles every pattern.

use std::collections::{BTreeSet, HashSet};

use regex::Regex;

use super::error::ConfigError;
use super::model::{EngineConfig, ProfileConfig};
use crate::parser::{Channel, LinePatterns, ParserProfile, EXCEPTION_TYPE};

const UNKNOWN_JOB_NAME: &str = "Unknown Name";
const NAME_GROUP: &str = "name";

/// Validated, ready-to-use parser configuration.
#[derive(Debug, Clone)]
pub struct ParserSet {
    pub profiles: Vec<ParserProfile>,
    pub patterns: LinePatterns,
}

impl EngineConfig {
    pub fn compile(&self) -> Result<ParserSet, ConfigError> {
        let patterns = LinePatterns {
            timestamp: compile_regex(&self.timestamp_pattern, || "timestamp_pattern".to_string())?,
            exception: compile_regex(&self.exception_pattern, || "exception_pattern".to_string())?,
        };

        let mut seen = HashSet::new();
        let mut profiles = Vec::with_capacity(self.profiles.len());
        for profile in &self.profiles {
            if !seen.insert(profile.name.as_str()) {
                return Err(ConfigError::DuplicateProfile(profile.name.clone()));
            }
            profiles.push(compile_profile(profile)?);
        }

        Ok(ParserSet { profiles, patterns })
    }
}

fn compile_profile(profile: &ProfileConfig) -> Result<ParserProfile, ConfigError> {
    if profile.name.trim().is_empty() {
        return Err(ConfigError::EmptyName("parser profile".to_string()));
    }

    let match_name = compile_regex(&profile.match_name, || {
        format!("match_name of parser '{}'", profile.name)
    })?;
    if !match_name.capture_names().flatten().any(|group| group == NAME_GROUP) {
        return Err(ConfigError::MissingNameGroup {
            profile: profile.name.clone(),
        });
    }

    let channels = profile
        .channels
        .iter()
        .map(|channel| {
            if channel.name.trim().is_empty() {
                return Err(ConfigError::EmptyName(format!(
                    "channel of parser '{}'",
                    profile.name
                )));
            }
            let pattern = compile_regex(&channel.pattern, || {
                format!("parser '{}' channel '{}'", profile.name, channel.name)
            })?;
            Ok(Channel::new(&channel.name, &channel.kind, pattern))
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    Ok(ParserProfile {
        name: profile.name.clone(),
        match_name,
        channels,
    })
}

fn compile_regex(pattern: &str, location: impl FnOnce() -> String) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidRegex {
        location: location(),
        source,
    })
}

impl ParserSet {
    /// First profile, in configuration order, whose `match_name` matches.
    pub fn select_profile(&self, job_name: &str) -> Option<&ParserProfile> {
        self.profiles.iter().find(|profile| profile.matches(job_name))
    }

    /// Short, human-friendly job name.
    ///
    /// The `name` capture of the first matching profile; the full name when
    /// no profile matches; "Unknown Name" for an empty name.
    pub fn display_name(&self, job_name: &str) -> String {
        if job_name.is_empty() {
            return UNKNOWN_JOB_NAME.to_string();
        }
        self.select_profile(job_name)
            .and_then(|profile| profile.short_name(job_name))
            .unwrap_or(job_name)
            .to_string()
    }

    /// Every channel type across all profiles plus "exception", sorted.
    pub fn event_types(&self) -> Vec<String> {
        self.profiles
            .iter()
            .flat_map(|profile| profile.channels.iter().map(|c| c.kind.as_str()))
            .chain(std::iter::once(EXCEPTION_TYPE))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
