//! Exception aggregator — folds runs of non-timestamped lines into one entry.
//!
//! Test runners print multi-line error traces (typically Perl `die` output
//! such as `... at /usr/lib/os-autoinst/consoles/VNC.pm line 123.`) without a
//! timestamp. The aggregator buffers such runs and, when the run closes,
//! promotes it to a single `exception` entry if it carries the configured
//! marker. Anything else in the run is noise and is discarded.

use chrono::{DateTime, NaiveDateTime, TimeDelta};
use regex::Regex;

use super::model::{LogEntry, TimestampError};

const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning,
    Buffering,
}

pub struct ExceptionAggregator<'a> {
    marker: &'a Regex,
    state: ScanState,
    buffer: Vec<&'a str>,
}

impl<'a> ExceptionAggregator<'a> {
    pub fn new(marker: &'a Regex) -> Self {
        Self {
            marker,
            state: ScanState::Scanning,
            buffer: Vec::new(),
        }
    }

    pub fn is_buffering(&self) -> bool {
        self.state == ScanState::Buffering
    }

    /// Buffer a line that has no timestamp prefix. Blank lines open the
    /// buffer but are not kept.
    pub fn push(&mut self, line: &'a str) {
        self.state = ScanState::Buffering;
        if !line.trim().is_empty() {
            self.buffer.push(line);
        }
    }

    /// Close the current run.
    ///
    /// `last_timestamp` is the most recent timestamp seen anywhere in the
    /// parse; the synthesized entry is placed 1ms after it. With no prior
    /// timestamp the entry is emitted without one.
    pub fn close(&mut self, last_timestamp: Option<&str>) -> Result<Option<LogEntry>, TimestampError> {
        self.state = ScanState::Scanning;
        if self.buffer.is_empty() {
            return Ok(None);
        }

        let block = std::mem::take(&mut self.buffer).join("\n");
        if !self.marker.is_match(&block) {
            tracing::trace!(lines = block.lines().count(), "discarding non-exception block");
            return Ok(None);
        }

        let timestamp = last_timestamp.map(offset_timestamp).transpose()?;
        Ok(Some(LogEntry::exception(timestamp, block)))
    }
}

/// Shift an ISO-8601 timestamp forward by one millisecond, keeping its
/// textual shape: date/time separator (`T` or space), fractional width of at
/// least 3, and numeric offset. A zero offset is written as `Z`.
pub fn offset_timestamp(timestamp: &str) -> Result<String, TimestampError> {
    let invalid = || TimestampError::Invalid(timestamp.to_string());
    let step = TimeDelta::milliseconds(1);
    let digits = match fraction_digits(timestamp) {
        0..=3 => 3,
        4..=6 => 6,
        _ => 9,
    };

    let (separator, normalized) = match timestamp.as_bytes().get(10) {
        Some(b' ') => (' ', format!("{}T{}", &timestamp[..10], &timestamp[11..])),
        _ => ('T', timestamp.to_string()),
    };
    let layout = format!("%Y-%m-%d{separator}%H:%M:%S%.{digits}f");

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        let shifted = dt.checked_add_signed(step).ok_or_else(invalid)?;
        let zone = if shifted.offset().local_minus_utc() == 0 { "Z" } else { "%:z" };
        return Ok(shifted.format(&format!("{layout}{zone}")).to_string());
    }

    let naive = NaiveDateTime::parse_from_str(&normalized, NAIVE_FORMAT).map_err(|_| invalid())?;
    let shifted = naive.checked_add_signed(step).ok_or_else(invalid)?;
    Ok(shifted.format(&layout).to_string())
}

fn fraction_digits(timestamp: &str) -> usize {
    timestamp
        .split_once('.')
        .map(|(_, rest)| rest.bytes().take_while(u8::is_ascii_digit).count())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker() -> Regex {
        Regex::new(r" at .*?\.pm line \d+").unwrap()
    }

    // ─── Synthetic timestamps ───────────────────────────────────

    #[test]
    fn test_offset_millis_with_z() {
        assert_eq!(
            offset_timestamp("2025-09-01T10:00:02.000Z").unwrap(),
            "2025-09-01T10:00:02.001Z"
        );
    }

    #[test]
    fn test_offset_without_fraction_gains_millis() {
        assert_eq!(
            offset_timestamp("2025-09-01T10:00:02Z").unwrap(),
            "2025-09-01T10:00:02.001Z"
        );
    }

    #[test]
    fn test_offset_carries_into_next_second() {
        assert_eq!(
            offset_timestamp("2025-12-31T23:59:59.999Z").unwrap(),
            "2026-01-01T00:00:00.000Z"
        );
    }

    #[test]
    fn test_offset_keeps_microsecond_width() {
        assert_eq!(
            offset_timestamp("2025-09-01T10:00:02.123456Z").unwrap(),
            "2025-09-01T10:00:02.124456Z"
        );
    }

    #[test]
    fn test_offset_keeps_numeric_offset() {
        assert_eq!(
            offset_timestamp("2025-09-01T10:00:02.000+02:00").unwrap(),
            "2025-09-01T10:00:02.001+02:00"
        );
    }

    #[test]
    fn test_offset_zero_offset_becomes_z() {
        assert_eq!(
            offset_timestamp("2025-09-01T10:00:02.000+00:00").unwrap(),
            "2025-09-01T10:00:02.001Z"
        );
    }

    #[test]
    fn test_offset_space_separator() {
        assert_eq!(
            offset_timestamp("2025-09-01 10:00:00.000").unwrap(),
            "2025-09-01 10:00:00.001"
        );
        assert_eq!(
            offset_timestamp("2025-09-01 10:00:00.000Z").unwrap(),
            "2025-09-01 10:00:00.001Z"
        );
    }

    #[test]
    fn test_offset_naive_timestamp() {
        assert_eq!(
            offset_timestamp("2025-09-01T10:00:02.500").unwrap(),
            "2025-09-01T10:00:02.501"
        );
    }

    #[test]
    fn test_offset_sorts_between_neighbours() {
        let t = "2025-09-01T10:00:02.000Z";
        let synthetic = offset_timestamp(t).unwrap();
        assert!(t < synthetic.as_str());
        assert!(synthetic.as_str() < "2025-09-01T10:00:02.002Z");
    }

    #[test]
    fn test_offset_rejects_garbage() {
        assert_eq!(
            offset_timestamp("T1"),
            Err(TimestampError::Invalid("T1".to_string()))
        );
    }

    // ─── Buffering ──────────────────────────────────────────────

    #[test]
    fn test_block_with_marker_becomes_exception() {
        let re = marker();
        let mut agg = ExceptionAggregator::new(&re);
        agg.push("Can't call method \"click\" on an undefined value at /usr/lib/os-autoinst/consoles/VNC.pm line 123.");
        agg.push("");
        agg.push("...");
        assert!(agg.is_buffering());

        let entry = agg.close(Some("2025-09-01T10:00:02.000Z")).unwrap().unwrap();
        assert!(entry.is_exception());
        assert_eq!(entry.timestamp.as_deref(), Some("2025-09-01T10:00:02.001Z"));
        assert!(entry.message.starts_with("Can't call method"));
        assert!(entry.message.ends_with("\n..."));
        assert!(entry.fields.is_empty());
        assert!(entry.event_name.is_none());
        assert!(!agg.is_buffering());
    }

    #[test]
    fn test_block_without_marker_is_discarded() {
        let re = marker();
        let mut agg = ExceptionAggregator::new(&re);
        agg.push("just some noise");
        assert_eq!(agg.close(Some("2025-09-01T10:00:00Z")).unwrap(), None);
    }

    #[test]
    fn test_blank_only_block_is_empty() {
        let re = marker();
        let mut agg = ExceptionAggregator::new(&re);
        agg.push("");
        agg.push("   ");
        assert!(agg.is_buffering());
        assert_eq!(agg.close(None).unwrap(), None);
    }

    #[test]
    fn test_exception_before_any_timestamp_has_none() {
        let re = marker();
        let mut agg = ExceptionAggregator::new(&re);
        agg.push("died at lib/testapi.pm line 9");
        let entry = agg.close(None).unwrap().unwrap();
        assert_eq!(entry.timestamp, None);
    }

    #[test]
    fn test_marker_may_span_joined_lines() {
        let re = Regex::new(r"died\n.* line \d+").unwrap();
        let mut agg = ExceptionAggregator::new(&re);
        agg.push("died");
        agg.push("  somewhere line 4");
        assert!(agg.close(Some("2025-09-01T10:00:00Z")).unwrap().is_some());
    }

    #[test]
    fn test_buffer_is_reset_between_blocks() {
        let re = marker();
        let mut agg = ExceptionAggregator::new(&re);
        agg.push("first at a.pm line 1");
        agg.close(Some("2025-09-01T10:00:00Z")).unwrap();
        agg.push("second at b.pm line 2");
        let entry = agg.close(Some("2025-09-01T10:00:05Z")).unwrap().unwrap();
        assert_eq!(entry.message, "second at b.pm line 2");
    }
}
