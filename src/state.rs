use chrono::{DateTime, Local};
use serde_json::{Map, Value};

use crate::error::FetchError;

/// The document currently on display.
///
/// Starts as an empty object and is replaced wholesale by every successful
/// fetch. Never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    info: Value,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            info: Value::Object(Map::new()),
        }
    }

    pub fn info(&self) -> &Value {
        &self.info
    }

    /// Overwrites the whole document. Returns true when the value changed.
    pub fn replace(&mut self, info: Value) -> bool {
        if self.info == info {
            return false;
        }
        self.info = info;
        true
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch bookkeeping shown in the status bar. Never feeds back into `AppState`.
#[derive(Debug, Clone, Default)]
pub struct PollStatus {
    pub issued: u64,
    pub resolved: u64,
    pub failed: u64,
    // Results from an older request that landed after a newer one.
    pub stale_applies: u64,
    pub last_applied_seq: Option<u64>,
    pub last_update: Option<DateTime<Local>>,
    pub last_error: Option<FetchError>,
}

impl PollStatus {
    pub fn record_issued(&mut self) {
        self.issued += 1;
    }

    pub fn record_success(&mut self, seq: u64) {
        self.resolved += 1;
        if matches!(self.last_applied_seq, Some(last) if last > seq) {
            self.stale_applies += 1;
        }
        self.last_applied_seq = Some(seq);
        self.last_update = Some(Local::now());
        self.last_error = None;
    }

    pub fn record_failure(&mut self, error: FetchError) {
        self.resolved += 1;
        self.failed += 1;
        self.last_error = Some(error);
    }

    pub fn in_flight(&self) -> u64 {
        self.issued.saturating_sub(self.resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn starts_as_empty_object() {
        let state = AppState::new();
        assert_eq!(state.info(), &json!({}));
    }

    #[test]
    fn replace_overwrites_without_merging() {
        let mut state = AppState::new();
        state.replace(json!({"a": 1, "b": 2}));
        state.replace(json!({"c": 3}));
        assert_eq!(state.info(), &json!({"c": 3}));
    }

    #[test]
    fn identical_documents_leave_state_unchanged() {
        let mut state = AppState::new();
        assert!(state.replace(json!({"v": 1})));
        assert!(!state.replace(json!({"v": 1})));
        assert_eq!(state.info(), &json!({"v": 1}));
    }

    #[test]
    fn status_counts_stale_applies() {
        let mut status = PollStatus::default();
        status.record_issued();
        status.record_issued();
        status.record_success(2);
        status.record_success(1);
        assert_eq!(status.stale_applies, 1);
        assert_eq!(status.last_applied_seq, Some(1));
        assert_eq!(status.in_flight(), 0);
    }

    #[test]
    fn failure_keeps_last_update() {
        let mut status = PollStatus::default();
        status.record_issued();
        status.record_success(1);
        let stamp = status.last_update;
        status.record_issued();
        status.record_failure(FetchError::Status(500));
        assert_eq!(status.last_update, stamp);
        assert_eq!(status.failed, 1);
        assert_eq!(status.last_error, Some(FetchError::Status(500)));
    }
}
