use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::counters::{CpuCounters, Uptime, cpu_usage_between};
use super::enumerate::ProcessEnumerator;
use super::kernel::KernelStatsReader;
use super::platform;
use super::process::{ProcessRawSnapshot, ProcessSnapshotReader};
use super::snapshot::{RankedProcess, SystemSnapshot};
use super::source::{DEFAULT_PROC_ROOT, ProcRoot};
use super::tracker::RateTracker;

/// Where per-process samples come from.
pub trait ProcessSource {
    fn list_process_ids(&self) -> Vec<u32>;
    fn read_snapshot(&self, pid: u32) -> Option<ProcessRawSnapshot>;
}

#[derive(Debug, Clone)]
pub struct ProcFs {
    enumerator: ProcessEnumerator,
    reader: ProcessSnapshotReader,
}

impl ProcFs {
    pub fn new(root: ProcRoot) -> Self {
        Self {
            enumerator: ProcessEnumerator::new(root.clone()),
            reader: ProcessSnapshotReader::new(root, platform::page_size()),
        }
    }
}

impl ProcessSource for ProcFs {
    fn list_process_ids(&self) -> Vec<u32> {
        self.enumerator.list_process_ids()
    }

    fn read_snapshot(&self, pid: u32) -> Option<ProcessRawSnapshot> {
        self.reader.read_snapshot(pid)
    }
}

/// Tracker key. The start time tells a recycled pid apart from the process
/// that previously held it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessKey {
    pub pid: u32,
    pub start_time: u64,
}

pub struct SnapshotAssembler<S> {
    source: S,
    tracker: RateTracker<ProcessKey>,
    ticks_per_second: u64,
    evict_stale: bool,
}

impl<S: ProcessSource> SnapshotAssembler<S> {
    pub fn new(source: S, ticks_per_second: u64) -> Self {
        Self {
            source,
            tracker: RateTracker::new(),
            ticks_per_second,
            evict_stale: true,
        }
    }

    pub fn with_eviction(mut self, evict_stale: bool) -> Self {
        self.evict_stale = evict_stale;
        self
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn tracker(&self) -> &RateTracker<ProcessKey> {
        &self.tracker
    }

    /// Top `limit` processes by CPU, highest first.
    pub fn build_ranked(&mut self, limit: usize) -> Vec<RankedProcess> {
        self.build_ranked_at(limit, Instant::now())
    }

    pub fn build_ranked_at(&mut self, limit: usize, now: Instant) -> Vec<RankedProcess> {
        let mut ranked = self.rank_all(now);
        ranked.truncate(limit);
        ranked
    }

    /// One pass over every live process. The sort is stable, so equal rates
    /// keep enumeration order.
    pub fn rank_all(&mut self, now: Instant) -> Vec<RankedProcess> {
        let _span = tracing::debug_span!("assembler.rank_all").entered();

        let pids = self.source.list_process_ids();
        let mut ranked = Vec::with_capacity(pids.len());

        for pid in pids {
            let Some(raw) = self.source.read_snapshot(pid) else {
                continue;
            };
            let cpu_percent = self.observe(&raw, now);
            ranked.push(RankedProcess {
                identity: raw.identity,
                cpu_percent,
                memory_mb: raw.resident_kb as f64 / 1024.0,
            });
        }

        if self.evict_stale {
            let evicted = self.tracker.end_cycle();
            if evicted > 0 {
                tracing::debug!(evicted, tracked = self.tracker.len(), "evicted stale entries");
            }
        }

        ranked.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
        ranked
    }

    /// Record a baseline for every live process without ranking anything.
    /// Returns the number of processes observed.
    pub fn prime_at(&mut self, now: Instant) -> usize {
        let _span = tracing::debug_span!("assembler.prime").entered();

        let mut primed = 0;
        for pid in self.source.list_process_ids() {
            if let Some(raw) = self.source.read_snapshot(pid) {
                self.observe(&raw, now);
                primed += 1;
            }
        }
        primed
    }

    fn observe(&mut self, raw: &ProcessRawSnapshot, now: Instant) -> f64 {
        let key = ProcessKey {
            pid: raw.identity.pid,
            start_time: raw.start_time,
        };
        self.tracker
            .observe(key, raw.total_ticks, now, self.ticks_per_second)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorSettings {
    pub proc_root: PathBuf,
    pub cpu_sample: Duration,
    pub limit: usize,
    pub evict_stale: bool,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
            cpu_sample: Duration::from_millis(1000),
            limit: 30,
            evict_stale: true,
        }
    }
}

/// Runs full sampling cycles: the aggregate CPU two-point sample, the other
/// system-wide counters, and a ranked process pass.
pub struct Collector<S = ProcFs> {
    kernel: KernelStatsReader,
    assembler: SnapshotAssembler<S>,
    cpu_sample: Duration,
    limit: usize,
}

impl Collector<ProcFs> {
    pub fn new(settings: &CollectorSettings) -> Self {
        let root = ProcRoot::new(&settings.proc_root);
        let assembler = SnapshotAssembler::new(
            ProcFs::new(root.clone()),
            platform::clock_ticks_per_second(),
        )
        .with_eviction(settings.evict_stale);
        Self::from_parts(
            KernelStatsReader::new(root),
            assembler,
            settings.cpu_sample,
            settings.limit,
        )
    }
}

impl<S: ProcessSource> Collector<S> {
    pub fn from_parts(
        kernel: KernelStatsReader,
        assembler: SnapshotAssembler<S>,
        cpu_sample: Duration,
        limit: usize,
    ) -> Self {
        Self {
            kernel,
            assembler,
            cpu_sample,
            limit,
        }
    }

    pub fn cpu_sample_interval(&self) -> Duration {
        self.cpu_sample
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
    }

    pub fn tracked_processes(&self) -> usize {
        self.assembler.tracker().len()
    }

    /// First half of the aggregate CPU sample. Wait
    /// [`cpu_sample_interval`](Self::cpu_sample_interval) before finishing.
    ///
    /// With nothing tracked yet, every process gets a baseline here too, so
    /// the first finished cycle ranks by rates over the sampling window.
    pub fn begin_cycle(&mut self) -> CpuCounters {
        if self.assembler.tracker().is_empty() {
            let primed = self.assembler.prime_at(Instant::now());
            tracing::debug!(primed, "recorded initial process baselines");
        }
        self.kernel.read_cpu_totals()
    }

    pub fn finish_cycle(&mut self, before: CpuCounters) -> SystemSnapshot {
        let _refresh_span = tracing::debug_span!("collector.refresh").entered();

        let after = self.kernel.read_cpu_totals();
        let cpu = cpu_usage_between(&before, &after);
        let memory = self.kernel.read_memory();
        let uptime = Uptime::from_seconds(self.kernel.read_uptime_seconds());
        let load_average = self.kernel.read_load_average();
        let process_counts = self.kernel.read_process_counts();

        let mut processes = self.assembler.rank_all(Instant::now());
        let process_total = processes.len();
        processes.truncate(self.limit);

        tracing::debug!(
            cpu_percent = cpu.percentage,
            process_total,
            tracked = self.assembler.tracker().len(),
            "sampling cycle complete"
        );

        SystemSnapshot {
            cpu,
            memory,
            uptime,
            load_average,
            process_counts,
            processes,
            process_total,
        }
    }

    /// A whole cycle, sleeping on the current thread between CPU samples.
    pub fn refresh_blocking(&mut self) -> SystemSnapshot {
        let before = self.begin_cycle();
        std::thread::sleep(self.cpu_sample);
        self.finish_cycle(before)
    }
}
