//! Error — configuration-load failures.
//!
//! Raised before any log is parsed; the parser itself never sees an invalid
//! pattern.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid regular expression for {location}: {source}")]
    InvalidRegex {
        location: String,
        #[source]
        source: regex::Error,
    },

    #[error("match_name of parser '{profile}' must contain a named group '(?P<name>...)'")]
    MissingNameGroup { profile: String },

    #[error("{0} must have a non-empty name")]
    EmptyName(String),

    #[error("Duplicate parser profile name: {0}")]
    DuplicateProfile(String),
}
