use super::source::ProcRoot;

/// Lists live process ids: proc entries whose names are all digits.
#[derive(Debug, Clone)]
pub struct ProcessEnumerator {
    root: ProcRoot,
}

impl ProcessEnumerator {
    pub fn new(root: ProcRoot) -> Self {
        Self { root }
    }

    /// Sorted ascending, which is the order ties are ranked in. An
    /// unreadable root gives an empty list.
    pub fn list_process_ids(&self) -> Vec<u32> {
        let entries = match std::fs::read_dir(self.root.path()) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(
                    root = %self.root.path().display(),
                    error = %err,
                    "cannot enumerate processes"
                );
                return Vec::new();
            }
        };

        let mut pids: Vec<u32> = entries
            .flatten()
            .filter_map(|entry| parse_pid(&entry.file_name().to_string_lossy()))
            .collect();
        pids.sort_unstable();
        pids.dedup();
        pids
    }
}

pub fn parse_pid(name: &str) -> Option<u32> {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}
