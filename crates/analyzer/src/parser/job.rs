//! Per-job log parser — drives the classifier and the exception aggregator
//! over one job's complete log text.

use std::collections::BTreeSet;

use super::classify::{timestamp_prefix, LineClassifier};
use super::exception::ExceptionAggregator;
use super::model::{Channel, LinePatterns, LogEntry, ParseError, ParsedLog, TimestampError};

const END_OF_FILE: &str = "end of file";

/// Parse one job's log.
///
/// Entries come back in file order, classified lines and exception blocks
/// interleaved as encountered. State (last timestamp, buffer) lives only for
/// this call, so independent jobs may be parsed concurrently.
pub fn parse_job_log(
    content: &str,
    channels: &[Channel],
    patterns: &LinePatterns,
) -> Result<ParsedLog, ParseError> {
    let classifier = LineClassifier::new(channels);
    let mut exceptions = ExceptionAggregator::new(&patterns.exception);
    let mut entries: Vec<LogEntry> = Vec::new();
    let mut last_timestamp: Option<&str> = None;
    let mut line_count = 0;

    for (index, line) in split_lines(content).enumerate() {
        line_count += 1;

        let Some(prefix) = timestamp_prefix(&patterns.timestamp, line) else {
            exceptions.push(line);
            continue;
        };

        if exceptions.is_buffering() {
            let closed = exceptions
                .close(last_timestamp)
                .map_err(|e| line_error(index + 1, line, e))?;
            entries.extend(closed);
        }

        last_timestamp = Some(prefix.value);

        match classifier.classify(line, prefix) {
            Some(entry) => entries.push(entry),
            None => tracing::trace!(line_number = index + 1, "no channel matched"),
        }
    }

    if exceptions.is_buffering() {
        let closed = exceptions
            .close(last_timestamp)
            .map_err(|e| line_error(line_count + 1, END_OF_FILE, e))?;
        entries.extend(closed);
    }

    let optional_columns: BTreeSet<&str> = entries
        .iter()
        .flat_map(|entry| entry.fields.iter().map(|(name, _)| name.as_str()))
        .collect();

    Ok(ParsedLog {
        match_count: entries.len(),
        optional_columns: optional_columns.into_iter().map(str::to_string).collect(),
        line_count,
        entries,
    })
}

/// Split on every line boundary a job log may contain: `\r\n`, or any one of
/// `\n`, `\r`, `\x0b`, `\x0c`, `\x1c`-`\x1e`, `\u{85}`, `\u{2028}`, `\u{2029}`.
/// A trailing boundary does not open an empty last line.
pub fn split_lines<'a>(content: &'a str) -> impl Iterator<Item = &'a str> {
    let mut rest = content;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let Some((at, boundary)) = rest.char_indices().find(|(_, c)| is_line_boundary(*c)) else {
            return Some(std::mem::take(&mut rest));
        };
        let line = &rest[..at];
        let mut next = at + boundary.len_utf8();
        if boundary == '\r' && rest[next..].starts_with('\n') {
            next += 1;
        }
        rest = &rest[next..];
        Some(line)
    })
}

fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn line_error(line_number: usize, line: &str, source: TimestampError) -> ParseError {
    ParseError::Line {
        line_number,
        line: line.to_string(),
        source: source.into(),
    }
}
