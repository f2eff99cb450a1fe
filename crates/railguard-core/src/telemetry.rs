//! Stage telemetry: structured events, bounded history, resource snapshots.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One structured event per pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    /// `input`, `generation` or `output`.
    pub stage: String,

    /// `pass`, `blocked`, `unavailable` or `error`.
    pub status: String,

    /// Operator-facing detail (verdict reason, error text, reply length).
    pub detail: String,

    /// Wall-clock seconds spent in the stage.
    pub elapsed_secs: f64,

    /// When the stage finished.
    pub at: DateTime<Utc>,
}

impl StageEvent {
    pub fn new(
        stage: impl Into<String>,
        status: impl Into<String>,
        detail: impl Into<String>,
        elapsed_secs: f64,
    ) -> Self {
        Self {
            stage: stage.into(),
            status: status.into(),
            detail: detail.into(),
            elapsed_secs,
            at: Utc::now(),
        }
    }
}

/// Append-only ring buffer of recent stage events.
///
/// Oldest events are dropped once `capacity` is reached. Event order reflects
/// evaluation order within and across requests.
#[derive(Debug)]
pub struct EventLog {
    events: VecDeque<StageEvent>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, event: StageEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Retained events, oldest first.
    pub fn recent(&self) -> Vec<StageEvent> {
        self.events.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Best-effort process resource snapshot.
///
/// Read from `/proc/self/status` where available; fields stay `None` on other
/// platforms or when the read fails. Never an error source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    /// Resident set size in kilobytes.
    pub rss_kb: Option<u64>,

    /// OS thread count.
    pub threads: Option<u64>,
}

impl ResourceSnapshot {
    pub fn capture() -> Self {
        let mut snapshot = Self::default();
        let status = match std::fs::read_to_string("/proc/self/status") {
            Ok(status) => status,
            Err(_) => return snapshot,
        };
        for line in status.lines() {
            if let Some(rest) = line.strip_prefix("VmRSS:") {
                snapshot.rss_kb = rest
                    .trim()
                    .trim_end_matches(" kB")
                    .trim()
                    .parse()
                    .ok();
            } else if let Some(rest) = line.strip_prefix("Threads:") {
                snapshot.threads = rest.trim().parse().ok();
            }
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_drops_oldest() {
        let mut log = EventLog::new(3);
        for i in 0..5 {
            log.push(StageEvent::new("input", "pass", format!("event {i}"), 0.0));
        }
        let recent = log.recent();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].detail, "event 2");
        assert_eq!(recent[2].detail, "event 4");
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut log = EventLog::new(0);
        log.push(StageEvent::new("input", "pass", "only", 0.1));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_event_serializes() {
        let event = StageEvent::new("output", "blocked", "competitor mentioned", 0.42);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["stage"], "output");
        assert_eq!(json["status"], "blocked");
    }

    #[test]
    fn test_snapshot_never_panics() {
        // On Linux both fields populate; elsewhere they stay None.
        let _ = ResourceSnapshot::capture();
    }
}
