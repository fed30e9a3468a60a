//! Model — EngineConfig and related structs.

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMESTAMP_PATTERN: &str = r"^\[([^\]]+)\]";
pub const DEFAULT_EXCEPTION_PATTERN: &str = r" at .*?\.pm line \d+";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Leading `[...]` timestamp; group 1 is the timestamp value
    pub timestamp_pattern: String,
    /// Inline stack-trace marker identifying exception blocks
    pub exception_pattern: String,
    pub profiles: Vec<ProfileConfig>,
}

/// One `[[profiles]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub name: String,
    /// Matched against the job's full name; must capture `(?P<name>...)`
    pub match_name: String,
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

/// One `[[profiles.channels]]` table. Order is priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub pattern: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timestamp_pattern: DEFAULT_TIMESTAMP_PATTERN.to_string(),
            exception_pattern: DEFAULT_EXCEPTION_PATTERN.to_string(),
            profiles: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Defaults ─────────────────────────────────────────────────

    #[test]
    fn test_engine_config_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.timestamp_pattern, r"^\[([^\]]+)\]");
        assert_eq!(cfg.exception_pattern, r" at .*?\.pm line \d+");
        assert!(cfg.profiles.is_empty());
    }

    // ── Deserialization ──────────────────────────────────────────

    #[test]
    fn test_deserialize_profiles() {
        let toml_str = r#"
            [[profiles]]
            name = "multimachine"
            match_name = '.*(?P<name>supportserver|client\d*).*'

            [[profiles.channels]]
            name = "mutex_lock"
            type = "mutex"
            pattern = "mutex lock '(?P<mutex>[^']+)'"

            [[profiles.channels]]
            name = "barrier_wait"
            type = "barrier"
            pattern = "barrier wait '(?P<barrier>[^']+)'"
        "#;
        let cfg: EngineConfig = toml::from_str(toml_str).expect("Should parse profiles");

        assert_eq!(cfg.profiles.len(), 1);
        let profile = &cfg.profiles[0];
        assert_eq!(profile.name, "multimachine");
        assert_eq!(profile.channels.len(), 2);
        assert_eq!(profile.channels[0].kind, "mutex");
        assert_eq!(profile.channels[1].name, "barrier_wait");
        // untouched top-level keys keep their defaults
        assert_eq!(cfg.timestamp_pattern, DEFAULT_TIMESTAMP_PATTERN);
    }

    #[test]
    fn test_channels_default_to_empty() {
        let toml_str = r#"
            [[profiles]]
            name = "bare"
            match_name = "(?P<name>.*)"
        "#;
        let cfg: EngineConfig = toml::from_str(toml_str).unwrap();
        assert!(cfg.profiles[0].channels.is_empty());
    }

    #[test]
    fn test_missing_profile_name_rejected() {
        let toml_str = r#"
            [[profiles]]
            match_name = "(?P<name>.*)"
        "#;
        assert!(toml::from_str::<EngineConfig>(toml_str).is_err());
    }

    #[test]
    fn test_missing_channel_name_rejected() {
        let toml_str = r#"
            [[profiles]]
            name = "parser1"
            match_name = "(?P<name>.*)"

            [[profiles.channels]]
            type = "error"
            pattern = ".*"
        "#;
        assert!(toml::from_str::<EngineConfig>(toml_str).is_err());
    }
}
