//! Plain-text rendering of a snapshot, used by `--plain` and `--once`.

use std::fmt::Write;
use std::str::FromStr;

use crossterm::style::{Color, Stylize};
use ratatui::backend::IntoCrossterm;

use crate::config::ColorsConfig;
use crate::format::{format_load, format_memory, format_uptime};
use crate::system::snapshot::SystemSnapshot;

const RULE: &str = "-------------------------------------";

/// Terminal colors for the table title and column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportColors {
    pub title: Color,
    pub header: Color,
}

impl Default for ReportColors {
    fn default() -> Self {
        Self {
            title: Color::DarkBlue,
            header: Color::DarkYellow,
        }
    }
}

impl ReportColors {
    /// Accepts the same names as the interactive view. Unknown names keep
    /// the default for that slot.
    pub fn from_config(colors: &ColorsConfig) -> Self {
        let defaults = Self::default();
        Self {
            title: parse_color(&colors.title).unwrap_or(defaults.title),
            header: parse_color(&colors.header).unwrap_or(defaults.header),
        }
    }
}

fn parse_color(name: &str) -> Option<Color> {
    ratatui::style::Color::from_str(name.trim())
        .ok()
        .map(IntoCrossterm::into_crossterm)
}

pub fn render_plain(
    snapshot: &SystemSnapshot,
    limit: usize,
    colors: Option<&ReportColors>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "++++++ BASIC SYSTEM MONITOR ++++++");
    let _ = writeln!(out, "CPU Usage: {:.2}%", snapshot.cpu.percentage);
    let _ = writeln!(out, "Memory Usage: {}", format_memory(snapshot.memory));
    let _ = writeln!(out, "Uptime: {}", format_uptime(snapshot.uptime));
    let _ = writeln!(
        out,
        "Most recent process PID: {}",
        snapshot.process_counts.most_recent_pid
    );
    let _ = writeln!(
        out,
        "Number of processes since boot: {}",
        snapshot.process_counts.total_since_boot
    );
    let _ = writeln!(
        out,
        "Currently running processes: {}",
        snapshot.process_counts.running
    );
    let _ = writeln!(
        out,
        "Scheduling entities: {}",
        snapshot.process_counts.scheduling_entities
    );
    let _ = writeln!(out, "Load Average: {}", format_load(snapshot.load_average));
    let _ = writeln!(out);
    let _ = writeln!(out, "{RULE}");

    let title = format!("    Top {limit} processes by CPU usage:");
    let header = format!("{:>7} {:>7} {:>10}  {}", "PID", "CPU%", "MEM (MB)", "Command");
    if let Some(colors) = colors {
        let _ = writeln!(out, "{}", title.with(colors.title));
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", header.with(colors.header));
    } else {
        let _ = writeln!(out, "{title}");
        let _ = writeln!(out);
        let _ = writeln!(out, "{header}");
    }

    for process in snapshot.processes.iter().take(limit) {
        let _ = writeln!(
            out,
            "{:>7} {:>6.1}% {:>10.1}  {}",
            process.identity.pid,
            process.cpu_percent,
            process.memory_mb,
            process.identity.command
        );
    }
    out
}

pub fn render_json(snapshot: &SystemSnapshot) -> serde_json::Result<String> {
    serde_json::to_string_pretty(snapshot)
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;
    use crate::system::counters::{
        CpuUsage, LoadAverage, MemoryCounters, ProcessCounts, Uptime,
    };
    use crate::system::process::ProcessIdentity;
    use crate::system::snapshot::RankedProcess;

    fn ranked(pid: u32, command: &str, cpu_percent: f64, memory_mb: f64) -> RankedProcess {
        RankedProcess {
            identity: ProcessIdentity {
                pid,
                command: command.to_string(),
            },
            cpu_percent,
            memory_mb,
        }
    }

    fn make_snapshot() -> SystemSnapshot {
        SystemSnapshot {
            cpu: CpuUsage {
                percentage: 75.0,
                total: 20,
                used: 15,
            },
            memory: MemoryCounters {
                total_bytes: 8_589_934_592,
                available_bytes: 6_442_450_944,
            },
            uptime: Uptime {
                hours: 5,
                minutes: 7,
            },
            load_average: LoadAverage::from_fixed_point([65_536, 32_768, 16_384]),
            process_counts: ProcessCounts {
                running: 3,
                total_since_boot: 9001,
                scheduling_entities: 467,
                most_recent_pid: 4242,
            },
            processes: vec![
                ranked(1234, "cargo", 50.0, 100.0),
                ranked(77, "Web Content", 12.5, 512.4),
                ranked(1, "systemd", 0.0, 11.5),
            ],
            process_total: 3,
        }
    }

    #[test]
    fn plain_report_layout() {
        let out = render_plain(&make_snapshot(), 2, None);
        assert_snapshot!(out, @r"
        ++++++ BASIC SYSTEM MONITOR ++++++
        CPU Usage: 75.00%
        Memory Usage: 2048 / 8192 MB (25.0%)
        Uptime: 5 hours 7 minutes
        Most recent process PID: 4242
        Number of processes since boot: 9001
        Currently running processes: 3
        Scheduling entities: 467
        Load Average: 1.00 , 0.50 , 0.25

        -------------------------------------
            Top 2 processes by CPU usage:

            PID    CPU%   MEM (MB)  Command
           1234   50.0%      100.0  cargo
             77   12.5%      512.4  Web Content
        ");
    }

    #[test]
    fn colored_report_keeps_content() {
        let out = render_plain(&make_snapshot(), 1, Some(&ReportColors::default()));
        assert!(out.contains("Top 1 processes by CPU usage:"));
        assert!(out.contains("cargo"));
        assert!(!out.contains("Web Content"));
    }

    #[test]
    fn report_colors_follow_config() {
        let colors = ReportColors::from_config(&ColorsConfig {
            title: "lightgreen".to_string(),
            header: "#102030".to_string(),
        });
        assert_eq!(colors.title, Color::Green);
        assert_eq!(colors.header, Color::Rgb { r: 0x10, g: 0x20, b: 0x30 });

        let fallback = ReportColors::from_config(&ColorsConfig {
            title: "not-a-color".to_string(),
            header: "yellow".to_string(),
        });
        assert_eq!(fallback.title, ReportColors::default().title);
        assert_eq!(fallback.header, Color::DarkYellow);
        assert_eq!(
            ReportColors::from_config(&ColorsConfig::default()),
            ReportColors::default()
        );
    }

    #[test]
    fn empty_process_list_still_renders_header() {
        let snapshot = SystemSnapshot::default();
        let out = render_plain(&snapshot, 30, None);
        assert!(out.contains("Top 30 processes by CPU usage:"));
        assert!(out.trim_end().ends_with("Command"));
    }

    #[test]
    fn json_contains_ranked_processes() {
        let json = render_json(&make_snapshot()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["processes"][0]["pid"], 1234);
        assert_eq!(value["processes"][0]["command"], "cargo");
        assert_eq!(value["process_counts"]["running"], 3);
        assert_eq!(value["process_counts"]["scheduling_entities"], 467);
        assert_eq!(value["memory"]["total_bytes"], 8_589_934_592u64);
    }
}
