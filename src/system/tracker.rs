//! Per-key CPU rate derivation from cumulative tick counters.
//!
//! The tracker keeps exactly one previous sample per key. Each call to
//! [`RateTracker::observe`] turns the difference between that sample and
//! the current one into a percentage of one CPU, then replaces it.
//!
//! Entries belong to a sampling cycle. [`RateTracker::end_cycle`] drops
//! every entry that was not observed in the current or the previous cycle,
//! which bounds the table by the number of recently live keys.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Sample {
    total_ticks: u64,
    sampled_at: Instant,
    last_seen_cycle: u64,
}

#[derive(Debug)]
pub struct RateTracker<K> {
    entries: HashMap<K, Sample>,
    cycle: u64,
}

impl<K> Default for RateTracker<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            cycle: 0,
        }
    }
}

impl<K: Hash + Eq> RateTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `current_ticks` for `key` at `now` and return the CPU rate
    /// since the previous observation, in percent of one CPU.
    ///
    /// Returns 0 for a first observation, for a counter that went
    /// backwards, and when no time has passed. In the last case the old
    /// baseline is kept so the next call measures the longer interval.
    pub fn observe(
        &mut self,
        key: K,
        current_ticks: u64,
        now: Instant,
        ticks_per_second: u64,
    ) -> f64 {
        let cycle = self.cycle;
        let fresh = Sample {
            total_ticks: current_ticks,
            sampled_at: now,
            last_seen_cycle: cycle,
        };

        let previous = match self.entries.entry(key) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => {
                slot.insert(fresh);
                return 0.0;
            }
        };

        let elapsed = match now.checked_duration_since(previous.sampled_at) {
            Some(elapsed) if !elapsed.is_zero() => elapsed.as_secs_f64(),
            _ => {
                previous.last_seen_cycle = cycle;
                return 0.0;
            }
        };

        let delta_ticks = current_ticks.saturating_sub(previous.total_ticks);
        *previous = fresh;

        rate_percent(delta_ticks, ticks_per_second, elapsed)
    }

    /// Close the current sampling cycle, evicting keys not observed in it
    /// or in the one before. Returns the number of evicted entries.
    pub fn end_cycle(&mut self) -> usize {
        let before = self.entries.len();
        let cycle = self.cycle;
        self.entries
            .retain(|_, sample| sample.last_seen_cycle.saturating_add(1) >= cycle);
        self.cycle += 1;
        before - self.entries.len()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.cycle = 0;
    }
}

/// `(delta / hz) / elapsed * 100`, or 0 when either denominator is not
/// positive.
pub fn rate_percent(delta_ticks: u64, ticks_per_second: u64, elapsed_secs: f64) -> f64 {
    if ticks_per_second == 0 || !elapsed_secs.is_finite() || elapsed_secs <= 0.0 {
        return 0.0;
    }
    let cpu_seconds = delta_ticks as f64 / ticks_per_second as f64;
    cpu_seconds / elapsed_secs * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const HZ: u64 = 100;

    #[test]
    fn first_observation_is_zero_and_records_baseline() {
        let mut tracker = RateTracker::new();
        let t0 = Instant::now();
        assert_eq!(tracker.observe(42u32, 1000, t0, HZ), 0.0);
        assert!(tracker.contains(&42));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn rate_over_two_seconds() {
        let mut tracker = RateTracker::new();
        let t0 = Instant::now();
        tracker.observe("42", 1000, t0, HZ);
        let rate = tracker.observe("42", 1100, t0 + Duration::from_secs(2), HZ);
        assert!((rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn unchanged_ticks_are_zero() {
        let mut tracker = RateTracker::new();
        let t0 = Instant::now();
        tracker.observe(1u32, 500, t0, HZ);
        assert_eq!(tracker.observe(1, 500, t0 + Duration::from_secs(5), HZ), 0.0);
    }

    #[test]
    fn zero_elapsed_keeps_baseline() {
        let mut tracker = RateTracker::new();
        let t0 = Instant::now();
        tracker.observe(1u32, 100, t0, HZ);
        assert_eq!(tracker.observe(1, 150, t0, HZ), 0.0);
        // Measured against the original baseline: 100 ticks over 1s.
        let rate = tracker.observe(1, 200, t0 + Duration::from_secs(1), HZ);
        assert!((rate - 100.0).abs() < 1e-9);
    }

    #[test]
    fn backwards_clock_is_zero() {
        let mut tracker = RateTracker::new();
        let t0 = Instant::now();
        let later = t0 + Duration::from_secs(10);
        tracker.observe(1u32, 100, later, HZ);
        assert_eq!(tracker.observe(1, 900, t0, HZ), 0.0);
    }

    #[test]
    fn counter_reset_clamps_and_rebaselines() {
        let mut tracker = RateTracker::new();
        let t0 = Instant::now();
        tracker.observe(7u32, 10_000, t0, HZ);
        let rate = tracker.observe(7, 20, t0 + Duration::from_secs(1), HZ);
        assert_eq!(rate, 0.0);
        // The reset value became the new baseline.
        let rate = tracker.observe(7, 70, t0 + Duration::from_secs(2), HZ);
        assert!((rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn zero_hz_is_guarded() {
        let mut tracker = RateTracker::new();
        let t0 = Instant::now();
        tracker.observe(1u32, 0, t0, 0);
        assert_eq!(tracker.observe(1, 100, t0 + Duration::from_secs(1), 0), 0.0);
    }

    #[test]
    fn rate_percent_guards() {
        assert_eq!(rate_percent(100, 100, 0.0), 0.0);
        assert_eq!(rate_percent(100, 100, -1.0), 0.0);
        assert_eq!(rate_percent(100, 100, f64::NAN), 0.0);
        assert_eq!(rate_percent(100, 0, 1.0), 0.0);
        assert!((rate_percent(250, 100, 1.0) - 250.0).abs() < 1e-9);
    }

    #[test]
    fn end_cycle_evicts_keys_missing_for_two_cycles() {
        let mut tracker = RateTracker::new();
        let t0 = Instant::now();
        tracker.observe(1u32, 0, t0, HZ);
        tracker.observe(2u32, 0, t0, HZ);
        assert_eq!(tracker.end_cycle(), 0);

        let t1 = t0 + Duration::from_secs(1);
        tracker.observe(1, 10, t1, HZ);
        // Key 2 was seen in the previous cycle, so it survives.
        assert_eq!(tracker.end_cycle(), 0);
        assert!(tracker.contains(&2));

        tracker.observe(1, 20, t1 + Duration::from_secs(1), HZ);
        assert_eq!(tracker.end_cycle(), 1);
        assert!(!tracker.contains(&2));
        assert!(tracker.contains(&1));
    }

    #[test]
    fn reset_clears_history() {
        let mut tracker = RateTracker::new();
        let t0 = Instant::now();
        tracker.observe(1u32, 100, t0, HZ);
        tracker.reset();
        assert!(tracker.is_empty());
        assert_eq!(tracker.observe(1, 200, t0 + Duration::from_secs(1), HZ), 0.0);
    }
}
