// src/utils/login_guard.rs

use std::{collections::HashMap, sync::Mutex};

use chrono::{DateTime, Duration, Utc};

pub const MAX_ATTEMPTS: u32 = 5;

/// Failed login bookkeeping for one client address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptRecord {
    pub count: u32,
    pub last_attempt: DateTime<Utc>,
}

/// Tracks failed logins per client address.
///
/// Implementations are shared across requests, so every method takes `&self`.
pub trait LoginAttempts: Send + Sync {
    /// True when `address` has used up its attempts and the window is still open.
    /// An address whose window has lapsed is reset as a side effect.
    fn is_locked_out(&self, address: &str) -> bool;

    /// Records a failure and returns how many attempts remain (floor zero).
    fn record_failure(&self, address: &str) -> u32;

    /// Forgets all failures for `address`.
    fn reset(&self, address: &str);
}

/// In-memory tracker. State is lost on restart.
#[derive(Debug)]
pub struct LoginGuard {
    max_attempts: u32,
    window: Duration,
    attempts: Mutex<HashMap<String, AttemptRecord>>,
}

impl Default for LoginGuard {
    fn default() -> Self {
        Self::new(MAX_ATTEMPTS, Duration::hours(24))
    }
}

impl LoginGuard {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, AttemptRecord>> {
        // A poisoned map only holds counters; keep serving with its contents.
        self.attempts.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Drops every record whose last failure is outside the window.
    fn evict_expired(&self, map: &mut HashMap<String, AttemptRecord>, now: DateTime<Utc>) {
        map.retain(|_, record| now - record.last_attempt < self.window);
    }

    pub fn is_locked_out_at(&self, address: &str, now: DateTime<Utc>) -> bool {
        let mut map = self.lock();
        self.evict_expired(&mut map, now);
        map.get(address)
            .is_some_and(|record| record.count >= self.max_attempts)
    }

    pub fn record_failure_at(&self, address: &str, now: DateTime<Utc>) -> u32 {
        let mut map = self.lock();
        self.evict_expired(&mut map, now);
        let record = map.entry(address.to_string()).or_insert(AttemptRecord {
            count: 0,
            last_attempt: now,
        });
        record.count += 1;
        record.last_attempt = now;
        self.max_attempts.saturating_sub(record.count)
    }

    #[cfg(test)]
    fn record(&self, address: &str) -> Option<AttemptRecord> {
        self.lock().get(address).copied()
    }

    #[cfg(test)]
    fn tracked_addresses(&self) -> usize {
        self.lock().len()
    }
}

impl LoginAttempts for LoginGuard {
    fn is_locked_out(&self, address: &str) -> bool {
        self.is_locked_out_at(address, Utc::now())
    }

    fn record_failure(&self, address: &str) -> u32 {
        self.record_failure_at(address, Utc::now())
    }

    fn reset(&self, address: &str) {
        self.lock().remove(address);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IP: &str = "10.0.0.1";

    #[test]
    fn counts_down_remaining_attempts() {
        let guard = LoginGuard::default();
        let now = Utc::now();
        let left: Vec<u32> = (0..6).map(|_| guard.record_failure_at(IP, now)).collect();
        assert_eq!(left, vec![4, 3, 2, 1, 0, 0]);
    }

    #[test]
    fn locks_after_five_failures_within_window() {
        let guard = LoginGuard::default();
        let start = Utc::now();
        for _ in 0..4 {
            guard.record_failure_at(IP, start);
        }
        assert!(!guard.is_locked_out_at(IP, start));
        guard.record_failure_at(IP, start);
        assert!(guard.is_locked_out_at(IP, start + Duration::hours(23)));
    }

    #[test]
    fn lockout_lapses_after_window() {
        let guard = LoginGuard::default();
        let start = Utc::now();
        for _ in 0..5 {
            guard.record_failure_at(IP, start);
        }
        let later = start + Duration::hours(24) + Duration::seconds(1);
        assert!(!guard.is_locked_out_at(IP, later));
        assert!(guard.record(IP).is_none());
        assert_eq!(guard.record_failure_at(IP, later), 4);
    }

    #[test]
    fn window_runs_from_latest_failure() {
        let guard = LoginGuard::default();
        let start = Utc::now();
        for i in 0..5 {
            guard.record_failure_at(IP, start + Duration::hours(i));
        }
        // 24h after the first failure but only 20h after the last one.
        assert!(guard.is_locked_out_at(IP, start + Duration::hours(24)));
    }

    #[test]
    fn reset_clears_address() {
        let guard = LoginGuard::default();
        guard.record_failure(IP);
        guard.reset(IP);
        assert!(guard.record(IP).is_none());
    }

    #[test]
    fn addresses_are_independent() {
        let guard = LoginGuard::default();
        let now = Utc::now();
        for _ in 0..5 {
            guard.record_failure_at(IP, now);
        }
        assert!(!guard.is_locked_out_at("10.0.0.2", now));
    }

    #[test]
    fn expired_entries_are_evicted() {
        let guard = LoginGuard::new(5, Duration::minutes(10));
        let start = Utc::now();
        guard.record_failure_at("a", start);
        guard.record_failure_at("b", start);
        assert_eq!(guard.tracked_addresses(), 2);
        guard.record_failure_at("c", start + Duration::minutes(11));
        assert_eq!(guard.tracked_addresses(), 1);
    }
}
