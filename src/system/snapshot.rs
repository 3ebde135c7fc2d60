use serde::Serialize;

use super::counters::{CpuUsage, LoadAverage, MemoryCounters, ProcessCounts, Uptime};
use super::process::ProcessIdentity;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedProcess {
    #[serde(flatten)]
    pub identity: ProcessIdentity,
    pub cpu_percent: f64,
    pub memory_mb: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SystemSnapshot {
    pub cpu: CpuUsage,
    pub memory: MemoryCounters,
    pub uptime: Uptime,
    pub load_average: LoadAverage,
    pub process_counts: ProcessCounts,
    /// Processes ranked by CPU, already truncated to the display limit.
    pub processes: Vec<RankedProcess>,
    /// Processes seen this cycle, before truncation.
    pub process_total: usize,
}
