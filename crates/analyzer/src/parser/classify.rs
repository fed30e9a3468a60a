//! Line classifier — one timestamped line in, zero or one entry out.

use regex::Regex;

use super::model::{Channel, LogEntry};

/// The leading timestamp of a line, as found by the timestamp pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampPrefix<'a> {
    /// Captured timestamp text (group 1, or the whole match without groups)
    pub value: &'a str,
    /// Byte length of the full prefix, brackets included
    pub len: usize,
}

/// Match `pattern` at the very start of `line`.
///
/// Returns `None` for lines that do not begin with a timestamp; those belong
/// to the exception aggregator.
pub fn timestamp_prefix<'a>(pattern: &Regex, line: &'a str) -> Option<TimestampPrefix<'a>> {
    let caps = pattern.captures(line)?;
    let whole = caps.get(0)?;
    if whole.start() != 0 {
        return None;
    }
    let value = caps.get(1).unwrap_or(whole).as_str();
    Some(TimestampPrefix {
        value,
        len: whole.end(),
    })
}

/// First-match-wins classifier over an ordered channel list.
#[derive(Debug, Clone, Copy)]
pub struct LineClassifier<'a> {
    channels: &'a [Channel],
}

impl<'a> LineClassifier<'a> {
    pub fn new(channels: &'a [Channel]) -> Self {
        Self { channels }
    }

    /// Classify a timestamped line.
    ///
    /// Channel patterns search the whole line (prefix included, unanchored).
    /// Only the first matching channel is used; a line matching none is
    /// dropped silently. Every named group of that channel becomes a field,
    /// unset when the group did not take part in the match.
    pub fn classify(&self, line: &str, prefix: TimestampPrefix<'_>) -> Option<LogEntry> {
        self.channels.iter().find_map(|channel| {
            let caps = channel.pattern.captures(line)?;

            let fields = channel
                .pattern
                .capture_names()
                .flatten()
                .map(|group| {
                    let value = caps.name(group).map(|m| m.as_str().to_string());
                    (group.to_string(), value)
                })
                .collect();

            Some(LogEntry {
                timestamp: Some(prefix.value.to_string()),
                message: line[prefix.len..].trim().to_string(),
                entry_type: channel.kind.clone(),
                event_name: Some(channel.name.clone()),
                fields,
            })
        })
    }
}
