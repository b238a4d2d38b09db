use crate::error::Result;
use crate::store::{Store, KEY_TIMESTAMPS, KEY_USAGE};
use std::collections::BTreeMap;

/// Default ranking decay window: 7 days.
pub const DEFAULT_DECAY_WINDOW_MS: i64 = 7 * 24 * 60 * 60 * 1000;

// ---------------------------------------------------------------------------
// UsageTracker
// ---------------------------------------------------------------------------

/// Per-transform invocation counts and last-used timestamps. Counts only
/// grow; nothing is ever evicted. Persisted through the store's `usage` and
/// `timestamps` keys after every mutation.
#[derive(Debug, Clone, Default)]
pub struct UsageTracker {
    counts: BTreeMap<String, u64>,
    timestamps: BTreeMap<String, i64>,
}

impl UsageTracker {
    pub fn load(store: &Store) -> Self {
        Self {
            counts: store.get(KEY_USAGE).unwrap_or_default(),
            timestamps: store.get(KEY_TIMESTAMPS).unwrap_or_default(),
        }
    }

    pub fn save(&self, store: &mut Store) -> Result<()> {
        store.set(KEY_USAGE, &self.counts)?;
        store.set(KEY_TIMESTAMPS, &self.timestamps)
    }

    pub fn record(&mut self, key: &str, now: i64) {
        *self.counts.entry(key.to_string()).or_insert(0) += 1;
        self.timestamps.insert(key.to_string(), now);
    }

    pub fn count(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn last_used(&self, key: &str) -> Option<i64> {
        self.timestamps.get(key).copied()
    }

    /// Exponentially time-decayed score: `count * exp(-age / window)`.
    /// Unused keys score zero; a missing timestamp counts as infinitely old.
    pub fn score(&self, key: &str, now: i64, decay_window_ms: i64) -> f64 {
        let count = self.count(key);
        if count == 0 {
            return 0.0;
        }
        let last = match self.last_used(key) {
            Some(ts) => ts,
            None => return 0.0,
        };
        let age = (now - last).max(0) as f64;
        count as f64 * (-age / decay_window_ms as f64).exp()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Ttl;
    use tempfile::TempDir;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    #[test]
    fn record_increments_and_stamps() {
        let mut usage = UsageTracker::default();
        usage.record("kebab-case", 1000);
        usage.record("kebab-case", 2000);
        assert_eq!(usage.count("kebab-case"), 2);
        assert_eq!(usage.last_used("kebab-case"), Some(2000));
    }

    #[test]
    fn higher_count_wins_at_equal_timestamps() {
        let mut usage = UsageTracker::default();
        let now = 10 * DAY_MS;
        usage.record("a", now);
        usage.record("a", now);
        usage.record("b", now);
        assert!(usage.score("a", now, DEFAULT_DECAY_WINDOW_MS)
            > usage.score("b", now, DEFAULT_DECAY_WINDOW_MS));
    }

    #[test]
    fn recency_wins_at_equal_counts() {
        let mut usage = UsageTracker::default();
        let now = 30 * DAY_MS;
        usage.record("old", now - 14 * DAY_MS);
        usage.record("fresh", now - DAY_MS);
        assert!(usage.score("fresh", now, DEFAULT_DECAY_WINDOW_MS)
            > usage.score("old", now, DEFAULT_DECAY_WINDOW_MS));
    }

    #[test]
    fn decay_is_monotonic_in_age() {
        let mut usage = UsageTracker::default();
        usage.record("k", 0);
        let mut prev = f64::INFINITY;
        for days in [0, 1, 7, 30, 365] {
            let s = usage.score("k", days * DAY_MS, DEFAULT_DECAY_WINDOW_MS);
            assert!(s <= prev, "score must not grow with age");
            assert!(s > 0.0);
            prev = s;
        }
    }

    #[test]
    fn unused_key_scores_zero() {
        let usage = UsageTracker::default();
        assert_eq!(usage.score("never", 1000, DEFAULT_DECAY_WINDOW_MS), 0.0);
    }

    #[test]
    fn persists_through_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipeline.json");
        let mut store = Store::open(&path, Ttl::Never).unwrap();

        let mut usage = UsageTracker::default();
        usage.record("sort-lines", 42_000);
        usage.save(&mut store).unwrap();

        let reopened = Store::open(&path, Ttl::Never).unwrap();
        let loaded = UsageTracker::load(&reopened);
        assert_eq!(loaded.count("sort-lines"), 1);
        assert_eq!(loaded.last_used("sort-lines"), Some(42_000));
    }
}
