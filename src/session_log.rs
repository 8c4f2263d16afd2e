//! Bounded in-memory session telemetry.
//!
//! Purely observational: engines record notable control events (trigger
//! pulls, steering jerks, nitro boosts) with a suggested remedy and the
//! gain of getting it right. The external reporting collaborator consumes
//! the entries; no core decision depends on them.

use crate::constants::SESSION_LOG_CAPACITY;
use std::collections::VecDeque;
use std::time::Instant;

/// One telemetry entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Elapsed session time, mm:ss.ss
    pub timestamp: String,
    pub event: String,
    pub data: String,
    pub remedy: String,
    pub gain: String,
}

/// Bounded ring of the most recent session events
#[derive(Debug)]
pub struct SessionLog {
    started: Instant,
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl SessionLog {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(SESSION_LOG_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            started: Instant::now(),
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record an event; the oldest entry is dropped once the log is full
    pub fn record(&mut self, event: &str, data: &str, remedy: &str, gain: &str) {
        let elapsed = self.started.elapsed();
        let timestamp = format!(
            "{:02}:{:05.2}",
            elapsed.as_secs() / 60,
            elapsed.as_secs_f64() % 60.0
        );

        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            timestamp,
            event: event.to_string(),
            data: data.to_string(),
            remedy: remedy.to_string(),
            gain: gain.to_string(),
        });
    }

    #[must_use]
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Restart the session clock and forget all entries
    pub fn reset(&mut self) {
        self.started = Instant::now();
        self.entries.clear();
    }
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_read_back() {
        let mut log = SessionLog::new();
        log.record("Trigger", "Fist Clench", "N/A", "Shot Fired");
        assert_eq!(log.len(), 1);

        let entry = log.entries().next().unwrap();
        assert_eq!(entry.event, "Trigger");
        assert!(entry.timestamp.contains(':'));
    }

    #[test]
    fn test_bounded_to_capacity() {
        let mut log = SessionLog::with_capacity(100);
        for i in 0..150 {
            log.record("Event", &i.to_string(), "", "");
        }
        assert_eq!(log.len(), 100);

        // Oldest entries were dropped
        let first = log.entries().next().unwrap();
        assert_eq!(first.data, "50");
    }

    #[test]
    fn test_reset_clears_entries() {
        let mut log = SessionLog::new();
        log.record("Brake", "Manual Input", "Corner Entry", "Speed Check");
        log.reset();
        assert!(log.is_empty());
    }
}
