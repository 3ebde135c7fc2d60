use std::path::Path;

use super::counters::{CpuCounters, LoadAverage, MemoryCounters, ProcessCounts};
use super::platform;
use super::source::{DEFAULT_PROC_ROOT, ProcRoot, SourceError};

/// Reads the system-wide counters. Every public read degrades to a zeroed
/// value when its source is missing or malformed.
#[derive(Debug, Clone)]
pub struct KernelStatsReader {
    root: ProcRoot,
    use_syscalls: bool,
}

impl KernelStatsReader {
    /// Syscall-backed values (fixed-point load averages) are only consulted
    /// when reading the live `/proc`, so a fixture root stays self-contained.
    pub fn new(root: ProcRoot) -> Self {
        let use_syscalls = root.path() == Path::new(DEFAULT_PROC_ROOT);
        Self { root, use_syscalls }
    }

    pub fn read_cpu_totals(&self) -> CpuCounters {
        degrade(self.try_read_stat(parse_cpu_line))
    }

    pub fn read_memory(&self) -> MemoryCounters {
        let path = self.root.file("meminfo");
        let result = self.root.read(&path).and_then(|content| {
            parse_meminfo(&content).ok_or_else(|| {
                SourceError::malformed(&path, "missing MemTotal/MemAvailable")
            })
        });
        degrade(result)
    }

    pub fn read_uptime_seconds(&self) -> u64 {
        let path = self.root.file("uptime");
        let result = self.root.read(&path).and_then(|content| {
            parse_uptime(&content).ok_or_else(|| SourceError::malformed(&path, "bad uptime"))
        });
        degrade(result)
    }

    pub fn read_load_average(&self) -> LoadAverage {
        if self.use_syscalls
            && let Some(raw) = platform::load_average_fixed()
        {
            return LoadAverage::from_fixed_point(raw);
        }
        degrade(self.try_read_loadavg().map(|fields| fields.load))
    }

    pub fn read_process_counts(&self) -> ProcessCounts {
        let loadavg = degrade(self.try_read_loadavg());
        let total_since_boot = degrade(self.try_read_stat(parse_processes_since_boot));
        ProcessCounts {
            running: loadavg.running,
            total_since_boot,
            scheduling_entities: loadavg.total_entities,
            most_recent_pid: loadavg.most_recent_pid,
        }
    }

    fn try_read_stat<T>(&self, parse: fn(&str) -> Option<T>) -> Result<T, SourceError> {
        let path = self.root.file("stat");
        let content = self.root.read(&path)?;
        parse(&content).ok_or_else(|| SourceError::malformed(&path, "unexpected layout"))
    }

    fn try_read_loadavg(&self) -> Result<LoadavgFields, SourceError> {
        let path = self.root.file("loadavg");
        let content = self.root.read(&path)?;
        parse_loadavg(&content).ok_or_else(|| SourceError::malformed(&path, "unexpected layout"))
    }
}

fn degrade<T: Default>(result: Result<T, SourceError>) -> T {
    result.unwrap_or_else(|err| {
        tracing::warn!(error = %err, "kernel stats source unavailable, using default");
        T::default()
    })
}

/// Parses the aggregate `cpu` line, which the kernel always emits first.
pub fn parse_cpu_line(stat: &str) -> Option<CpuCounters> {
    let mut fields = stat.lines().next()?.split_whitespace();
    if fields.next()? != "cpu" {
        return None;
    }
    let mut next = || fields.next()?.parse::<u64>().ok();
    Some(CpuCounters {
        user: next()?,
        nice: next()?,
        system: next()?,
        idle: next()?,
    })
}

pub fn parse_processes_since_boot(stat: &str) -> Option<u64> {
    stat.lines()
        .find_map(|line| line.strip_prefix("processes "))
        .and_then(|value| value.trim().parse().ok())
}

/// `MemTotal` and `MemAvailable` in bytes. Kernels older than 3.14 lack
/// `MemAvailable`; `MemFree` stands in for it there.
pub fn parse_meminfo(meminfo: &str) -> Option<MemoryCounters> {
    let mut total = None;
    let mut available = None;
    let mut free = None;
    for line in meminfo.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let kb = rest
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<u64>().ok());
        match key {
            "MemTotal" => total = kb,
            "MemAvailable" => available = kb,
            "MemFree" => free = kb,
            _ => {}
        }
        if total.is_some() && available.is_some() {
            break;
        }
    }
    Some(MemoryCounters {
        total_bytes: total?.saturating_mul(1024),
        available_bytes: available.or(free)?.saturating_mul(1024),
    })
}

pub fn parse_uptime(uptime: &str) -> Option<u64> {
    let seconds: f64 = uptime.split_whitespace().next()?.parse().ok()?;
    if seconds.is_finite() && seconds >= 0.0 {
        Some(seconds as u64)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadavgFields {
    pub load: LoadAverage,
    pub running: u64,
    pub total_entities: u64,
    pub most_recent_pid: u32,
}

/// Format: `0.52 0.58 0.59 3/467 12345`.
pub fn parse_loadavg(loadavg: &str) -> Option<LoadavgFields> {
    let fields: Vec<&str> = loadavg.split_whitespace().collect();
    if fields.len() < 5 {
        return None;
    }
    let (running, total) = fields[3].split_once('/')?;
    Some(LoadavgFields {
        load: LoadAverage {
            one: fields[0].parse().ok()?,
            five: fields[1].parse().ok()?,
            fifteen: fields[2].parse().ok()?,
        },
        running: running.parse().ok()?,
        total_entities: total.parse().ok()?,
        most_recent_pid: fields[4].parse().ok()?,
    })
}
