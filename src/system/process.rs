use serde::Serialize;

use super::source::{ProcRoot, SourceError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessIdentity {
    pub pid: u32,
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRawSnapshot {
    pub identity: ProcessIdentity,
    /// utime + stime + cutime + cstime, in clock ticks.
    pub total_ticks: u64,
    pub resident_kb: u64,
    /// Ticks after boot at which the process started; 0 when unknown.
    pub start_time: u64,
}

/// Fields of `/proc/<pid>/stat` that the monitor uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatFields {
    pub comm: String,
    pub total_ticks: u64,
    pub start_time: u64,
}

/// Parses `/proc/<pid>/stat`. The command sits in parentheses and may itself
/// contain spaces or `)`, so numeric fields are counted from the last `)`.
pub fn parse_stat(stat: &str) -> Option<StatFields> {
    let open = stat.find('(')?;
    let close = stat.rfind(')')?;
    if close < open {
        return None;
    }
    let comm = stat[open + 1..close].to_string();
    let fields: Vec<&str> = stat[close + 1..].split_whitespace().collect();

    // After comm: state(0) ... utime(11) stime(12) cutime(13) cstime(14)
    // ... starttime(19)
    let unsigned = |idx: usize| fields.get(idx)?.parse::<u64>().ok();
    // cutime/cstime are signed in the kernel ABI.
    let signed = |idx: usize| {
        fields
            .get(idx)?
            .parse::<i64>()
            .ok()
            .map(|v| v.max(0) as u64)
    };

    let total_ticks = unsigned(11)?
        .saturating_add(unsigned(12)?)
        .saturating_add(signed(13)?)
        .saturating_add(signed(14)?);
    let start_time = unsigned(19).unwrap_or(0);

    Some(StatFields {
        comm,
        total_ticks,
        start_time,
    })
}

/// Resident page count: the second field of `/proc/<pid>/statm`.
pub fn parse_statm_resident_pages(statm: &str) -> Option<u64> {
    statm.split_whitespace().nth(1)?.parse().ok()
}

pub fn resident_kb(pages: u64, page_size: u64) -> u64 {
    pages.saturating_mul(page_size) / 1024
}

#[derive(Debug, Clone)]
pub struct ProcessSnapshotReader {
    root: ProcRoot,
    page_size: u64,
}

impl ProcessSnapshotReader {
    pub fn new(root: ProcRoot, page_size: u64) -> Self {
        Self { root, page_size }
    }

    /// `None` when the process is gone or its stat file cannot be parsed.
    pub fn read_snapshot(&self, pid: u32) -> Option<ProcessRawSnapshot> {
        match self.try_read_snapshot(pid) {
            Ok(snapshot) => Some(snapshot),
            Err(err) if err.is_not_found() => {
                tracing::trace!(pid, "process exited before it could be read");
                None
            }
            Err(err) => {
                tracing::debug!(pid, error = %err, "skipping unreadable process");
                None
            }
        }
    }

    fn try_read_snapshot(&self, pid: u32) -> Result<ProcessRawSnapshot, SourceError> {
        let stat_path = self.root.pid_file(pid, "stat");
        let stat_text = self.root.read(&stat_path)?;
        let stat = parse_stat(&stat_text)
            .ok_or_else(|| SourceError::malformed(&stat_path, "unexpected layout"))?;

        let command = self
            .root
            .read(&self.root.pid_file(pid, "comm"))
            .map(|comm| comm.trim().to_string())
            .ok()
            .filter(|comm| !comm.is_empty())
            .unwrap_or(stat.comm);

        let resident_kb = self
            .root
            .read(&self.root.pid_file(pid, "statm"))
            .ok()
            .and_then(|statm| parse_statm_resident_pages(&statm))
            .map(|pages| resident_kb(pages, self.page_size))
            .unwrap_or(0);

        Ok(ProcessRawSnapshot {
            identity: ProcessIdentity { pid, command },
            total_ticks: stat.total_ticks,
            resident_kb,
            start_time: stat.start_time,
        })
    }
}
