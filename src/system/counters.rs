//! Raw kernel counters and the pure conversions applied to them.

use serde::Serialize;

const BYTES_PER_MB: u64 = 1024 * 1024;
const LOAD_FIXED_POINT_SCALE: f64 = 65536.0;

/// Aggregate CPU time in clock ticks since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CpuCounters {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
}

impl CpuCounters {
    pub fn total(&self) -> u64 {
        self.user
            .saturating_add(self.nice)
            .saturating_add(self.system)
            .saturating_add(self.idle)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CpuUsage {
    pub percentage: f64,
    /// Ticks elapsed across all fields between the two samples.
    pub total: u64,
    /// Non-idle ticks elapsed between the two samples.
    pub used: u64,
}

/// Utilization between two consecutive aggregate samples.
///
/// Each field difference saturates at zero so a counter reset between the
/// samples cannot produce a negative or non-finite percentage.
pub fn cpu_usage_between(before: &CpuCounters, after: &CpuCounters) -> CpuUsage {
    let delta = |a: u64, b: u64| b.saturating_sub(a);
    let used = delta(before.user, after.user)
        .saturating_add(delta(before.nice, after.nice))
        .saturating_add(delta(before.system, after.system));
    let total = used.saturating_add(delta(before.idle, after.idle));

    let percentage = if total == 0 {
        0.0
    } else {
        used as f64 / total as f64 * 100.0
    };

    CpuUsage {
        percentage,
        total,
        used,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoryCounters {
    pub total_bytes: u64,
    pub available_bytes: u64,
}

impl MemoryCounters {
    pub fn total_mb(&self) -> u64 {
        bytes_to_mb(self.total_bytes)
    }

    pub fn available_mb(&self) -> u64 {
        bytes_to_mb(self.available_bytes)
    }

    pub fn used_mb(&self) -> u64 {
        self.total_mb().saturating_sub(self.available_mb())
    }

    pub fn used_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        let used = self.total_bytes.saturating_sub(self.available_bytes);
        used as f64 / self.total_bytes as f64 * 100.0
    }
}

pub fn bytes_to_mb(bytes: u64) -> u64 {
    bytes / BYTES_PER_MB
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

impl LoadAverage {
    /// Convert the kernel's 16.16 fixed-point encoding.
    pub fn from_fixed_point(raw: [u64; 3]) -> Self {
        Self {
            one: fixed_point_to_f64(raw[0]),
            five: fixed_point_to_f64(raw[1]),
            fifteen: fixed_point_to_f64(raw[2]),
        }
    }
}

pub fn fixed_point_to_f64(raw: u64) -> f64 {
    raw as f64 / LOAD_FIXED_POINT_SCALE
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Uptime {
    pub hours: u64,
    pub minutes: u64,
}

impl Uptime {
    pub fn from_seconds(seconds: u64) -> Self {
        let hours = seconds / 3600;
        let minutes = seconds % 3600 / 60;
        Self { hours, minutes }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProcessCounts {
    pub running: u64,
    pub total_since_boot: u64,
    /// Threads and processes the scheduler currently knows about.
    pub scheduling_entities: u64,
    pub most_recent_pid: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_usage_between_two_samples() {
        let before = CpuCounters {
            user: 100,
            nice: 0,
            system: 50,
            idle: 850,
        };
        let after = CpuCounters {
            user: 110,
            nice: 0,
            system: 55,
            idle: 855,
        };
        let usage = cpu_usage_between(&before, &after);
        assert_eq!(usage.total, 20);
        assert_eq!(usage.used, 15);
        assert!((usage.percentage - 75.0).abs() < 1e-9);
    }

    #[test]
    fn cpu_usage_example_from_busy_system() {
        let before = CpuCounters {
            user: 100,
            nice: 0,
            system: 50,
            idle: 850,
        };
        let after = CpuCounters {
            user: 160,
            nice: 0,
            system: 55,
            idle: 855,
        };
        let usage = cpu_usage_between(&before, &after);
        assert_eq!(usage.total, 70);
        assert_eq!(usage.used, 65);
        assert!((usage.percentage - 92.857_142).abs() < 1e-3);
    }

    #[test]
    fn identical_samples_are_zero_percent() {
        let sample = CpuCounters {
            user: 5,
            nice: 5,
            system: 5,
            idle: 5,
        };
        let usage = cpu_usage_between(&sample, &sample);
        assert_eq!(usage.percentage, 0.0);
        assert_eq!(usage.total, 0);
    }

    #[test]
    fn counter_reset_does_not_go_negative() {
        let before = CpuCounters {
            user: 1000,
            nice: 10,
            system: 500,
            idle: 9000,
        };
        let after = CpuCounters {
            user: 3,
            nice: 0,
            system: 1,
            idle: 20,
        };
        let usage = cpu_usage_between(&before, &after);
        assert!(usage.percentage.is_finite());
        assert!(usage.percentage >= 0.0);
    }

    #[test]
    fn huge_counters_saturate() {
        let after = CpuCounters {
            user: u64::MAX,
            nice: u64::MAX,
            system: u64::MAX,
            idle: u64::MAX,
        };
        assert_eq!(after.total(), u64::MAX);
        let usage = cpu_usage_between(&CpuCounters::default(), &after);
        assert_eq!(usage.total, u64::MAX);
        assert_eq!(usage.used, u64::MAX);
        assert!((usage.percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn load_average_fixed_point() {
        assert_eq!(fixed_point_to_f64(172_032), 2.625);
        let load = LoadAverage::from_fixed_point([65_536, 32_768, 0]);
        assert_eq!(load.one, 1.0);
        assert_eq!(load.five, 0.5);
        assert_eq!(load.fifteen, 0.0);
    }

    #[test]
    fn memory_conversions() {
        let mem = MemoryCounters {
            total_bytes: 8_589_934_592,
            available_bytes: 2_147_483_648,
        };
        assert_eq!(mem.total_mb(), 8192);
        assert_eq!(mem.available_mb(), 2048);
        assert_eq!(mem.used_mb(), 6144);
        assert!((mem.used_percent() - 75.0).abs() < 1e-9);
        assert_eq!(MemoryCounters::default().used_percent(), 0.0);
    }

    #[test]
    fn uptime_split() {
        assert_eq!(
            Uptime::from_seconds(3 * 3600 + 25 * 60 + 59),
            Uptime {
                hours: 3,
                minutes: 25
            }
        );
        assert_eq!(Uptime::from_seconds(59), Uptime::default());
    }
}
