//! Operator event log
//!
//! Newest-first, bounded at [`LOG_CAPACITY`] entries. A message is dropped
//! when the newest entry already contains its first [`DEDUP_PREFIX_CHARS`]
//! characters, which suppresses immediate repeats only.

use std::collections::VecDeque;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::config::{DEDUP_PREFIX_CHARS, LOG_CAPACITY};

/// A single timestamped log line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Local wall-clock time, `HH:MM:SS`
    pub time: String,
    pub message: String,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.time, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend `message` unless it repeats the newest entry.
    /// Returns whether the entry was added.
    pub fn append(&mut self, message: impl Into<String>, now: DateTime<Local>) -> bool {
        let message = message.into();
        if self.repeats_newest(&message) {
            return false;
        }

        self.entries.push_front(LogEntry {
            time: now.format("%H:%M:%S").to_string(),
            message,
        });
        self.entries.truncate(LOG_CAPACITY);
        true
    }

    /// Empty the log, leaving only the notice that it was cleared
    pub fn clear(&mut self, now: DateTime<Local>) {
        self.entries.clear();
        self.append("Event log cleared by operator", now);
    }

    /// Entries, newest first
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    pub fn newest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn repeats_newest(&self, message: &str) -> bool {
        let prefix: String = message.chars().take(DEDUP_PREFIX_CHARS).collect();
        self.entries
            .front()
            .is_some_and(|newest| newest.message.contains(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 1, h, m, s).single().unwrap()
    }

    #[test]
    fn test_append_is_newest_first() {
        let mut log = EventLog::new();
        assert!(log.append("first message here", at(8, 0, 0)));
        assert!(log.append("second message here", at(8, 0, 3)));

        let messages: Vec<&str> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["second message here", "first message here"]);
        assert_eq!(log.newest().unwrap().time, "08:00:03");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut log = EventLog::new();
        for i in 0..(LOG_CAPACITY + 25) {
            log.append(format!("entry number {:04}", i), at(9, 0, 0));
        }

        assert_eq!(log.len(), LOG_CAPACITY);
        let newest = format!("entry number {:04}", LOG_CAPACITY + 24);
        let oldest_kept = format!("entry number {:04}", 25);
        assert_eq!(log.newest().unwrap().message, newest);
        assert_eq!(log.entries().last().unwrap().message, oldest_kept);
    }

    #[test]
    fn test_dedup_against_newest_prefix() {
        let mut log = EventLog::new();
        log.append("Auto: light OFF (3012 lx > threshold 2500 lx)", at(13, 0, 0));

        // Same first 20 characters, different tail
        assert!(!log.append("Auto: light OFF (3012 lx again)", at(13, 0, 3)));
        assert_eq!(log.len(), 1);

        assert!(log.append("Auto: light ON (410 lx <= threshold 500 lx)", at(22, 0, 0)));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_dedup_only_checks_newest() {
        let mut log = EventLog::new();
        log.append("OPERATOR: forced lighting ON", at(10, 0, 0));
        log.append("WARNING: automatic control disabled", at(10, 0, 0));

        // Repeats an older entry, not the newest one
        assert!(log.append("OPERATOR: forced lighting ON", at(10, 0, 5)));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_short_message_dedup_uses_whole_message() {
        let mut log = EventLog::new();
        log.append("Light ON at 07:00", at(7, 0, 0));
        assert!(!log.append("Light ON", at(7, 0, 3)));
        assert!(log.append("Light OFF", at(7, 0, 6)));
    }

    #[test]
    fn test_dedup_prefix_counts_characters() {
        let mut log = EventLog::new();
        // Multi-byte characters must not split a code point
        log.append("Освещение включено оператором", at(12, 0, 0));
        assert!(!log.append("Освещение включено оператором снова", at(12, 0, 3)));
    }

    #[test]
    fn test_clear_leaves_notice() {
        let mut log = EventLog::new();
        for i in 0..10 {
            log.append(format!("reading {} recorded ok", i), at(11, 0, i));
        }
        log.clear(at(11, 1, 0));

        assert_eq!(log.len(), 1);
        assert_eq!(log.newest().unwrap().message, "Event log cleared by operator");
        assert_eq!(log.newest().unwrap().time, "11:01:00");
    }

    #[test]
    fn test_entry_display() {
        let entry = LogEntry {
            time: "21:15:09".to_string(),
            message: "Auto: light ON".to_string(),
        };
        assert_eq!(entry.to_string(), "[21:15:09] Auto: light ON");
    }
}
