//! Per-caller command cooldowns.
//!
//! Owned by whoever dispatches commands (the API state or a [`Dispatcher`]),
//! never global.
//!
//! [`Dispatcher`]: crate::bot::Dispatcher

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Remembers when each caller may issue the next command.
#[derive(Debug, Clone)]
pub struct CooldownTracker {
    window: Duration,
    expiries: HashMap<String, DateTime<Utc>>,
}

impl CooldownTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            expiries: HashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Let `caller` through and start a new window, or return how long they
    /// still have to wait.
    pub fn check(&mut self, caller: &str, now: DateTime<Utc>) -> Result<(), Duration> {
        if let Some(remaining) = self.remaining(caller, now) {
            return Err(remaining);
        }

        let expiry = self.expiry_from(now);
        self.expiries.insert(caller.to_string(), expiry);
        Ok(())
    }

    /// End of a window starting at `now`, clamped to the latest representable
    /// instant.
    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        chrono::Duration::from_std(self.window)
            .ok()
            .and_then(|window| now.checked_add_signed(window))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Time left on a caller's cooldown, if any.
    pub fn remaining(&self, caller: &str, now: DateTime<Utc>) -> Option<Duration> {
        let expiry = self.expiries.get(caller)?;
        (*expiry - now).to_std().ok().filter(|d| !d.is_zero())
    }

    /// Drop expired entries.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        self.expiries.retain(|_, expiry| *expiry > now);
    }

    /// Callers currently cooling down (including entries not yet pruned).
    pub fn len(&self) -> usize {
        self.expiries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expiries.is_empty()
    }
}

/// Seconds to show a waiting caller, rounded up.
pub fn wait_secs(remaining: Duration) -> u64 {
    remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
}

impl Default for CooldownTracker {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_first_call_passes() {
        let mut tracker = CooldownTracker::default();
        assert!(tracker.check("alice", at(0)).is_ok());
    }

    #[test]
    fn test_second_call_inside_window_blocked() {
        let mut tracker = CooldownTracker::new(Duration::from_secs(30));
        tracker.check("alice", at(0)).unwrap();

        assert_eq!(
            tracker.check("alice", at(10)),
            Err(Duration::from_secs(20))
        );
    }

    #[test]
    fn test_blocked_call_does_not_extend_window() {
        let mut tracker = CooldownTracker::new(Duration::from_secs(30));
        tracker.check("alice", at(0)).unwrap();
        let _ = tracker.check("alice", at(29));

        assert!(tracker.check("alice", at(30)).is_ok());
    }

    #[test]
    fn test_callers_are_independent() {
        let mut tracker = CooldownTracker::new(Duration::from_secs(30));
        tracker.check("alice", at(0)).unwrap();

        assert!(tracker.check("bob", at(1)).is_ok());
        assert!(tracker.check("alice", at(1)).is_err());
    }

    #[test]
    fn test_prune() {
        let mut tracker = CooldownTracker::new(Duration::from_secs(30));
        tracker.check("alice", at(0)).unwrap();
        tracker.check("bob", at(20)).unwrap();

        tracker.prune(at(31));
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.remaining("bob", at(31)), Some(Duration::from_secs(19)));
        assert_eq!(tracker.remaining("alice", at(31)), None);
    }

    #[test]
    fn test_wait_secs_rounds_up() {
        assert_eq!(wait_secs(Duration::from_secs(20)), 20);
        assert_eq!(wait_secs(Duration::from_millis(19_001)), 20);
        assert_eq!(wait_secs(Duration::from_millis(1)), 1);
    }

    #[test]
    fn test_huge_window_saturates() {
        let mut tracker = CooldownTracker::new(Duration::from_secs(u64::MAX));
        tracker.check("alice", at(0)).unwrap();

        assert!(tracker.check("alice", at(1_000_000)).is_err());
        assert!(tracker.remaining("alice", at(0)).is_some());
    }

    #[test]
    fn test_window_accessor() {
        assert_eq!(CooldownTracker::default().window(), Duration::from_secs(30));
    }

    #[test]
    fn test_zero_window_never_blocks() {
        let mut tracker = CooldownTracker::new(Duration::ZERO);
        tracker.check("alice", at(0)).unwrap();
        assert!(tracker.check("alice", at(0)).is_ok());
    }
}
