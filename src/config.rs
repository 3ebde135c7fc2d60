use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::system::collector::CollectorSettings;
use crate::system::source::DEFAULT_PROC_ROOT;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub tracker: TrackerConfig,
    pub colors: ColorsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub top_processes: usize,
    pub cpu_sample_ms: u64,
    pub refresh_pause_ms: u64,
    pub proc_root: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            top_processes: 30,
            cpu_sample_ms: 1000,
            refresh_pause_ms: 500,
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub evict_stale: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig { evict_stale: true }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub title: String,
    pub header: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        ColorsConfig {
            title: "blue".to_string(),
            header: "yellow".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub file: Option<PathBuf>,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            file: None,
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn collector_settings(&self) -> CollectorSettings {
        CollectorSettings {
            proc_root: self.general.proc_root.clone(),
            cpu_sample: Duration::from_millis(self.general.cpu_sample_ms),
            limit: self.general.top_processes,
            evict_stale: self.tracker.evict_stale,
        }
    }

    pub fn refresh_pause(&self) -> Duration {
        Duration::from_millis(self.general.refresh_pause_ms)
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("ticktop").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.general.top_processes, 30);
        assert_eq!(config.general.cpu_sample_ms, 1000);
        assert_eq!(config.general.refresh_pause_ms, 500);
        assert_eq!(config.general.proc_root, PathBuf::from("/proc"));
        assert!(config.tracker.evict_stale);
        assert_eq!(config.colors.title, "blue");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[general]
top_processes = 10
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.top_processes, 10);
        // Other fields should be defaults
        assert_eq!(config.general.cpu_sample_ms, 1000);
        assert!(config.tracker.evict_stale);
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[general]
top_processes = 15
cpu_sample_ms = 250
refresh_pause_ms = 100
proc_root = "/host/proc"

[tracker]
evict_stale = false

[colors]
title = "cyan"
header = "green"

[logging]
file = "/tmp/ticktop.jsonl"
level = "debug"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let settings = config.collector_settings();
        assert_eq!(settings.limit, 15);
        assert_eq!(settings.cpu_sample, Duration::from_millis(250));
        assert_eq!(settings.proc_root, PathBuf::from("/host/proc"));
        assert!(!settings.evict_stale);
        assert_eq!(config.refresh_pause(), Duration::from_millis(100));
        assert_eq!(config.colors.header, "green");
        assert_eq!(
            config.logging.file.as_deref(),
            Some(Path::new("/tmp/ticktop.jsonl"))
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.general.top_processes, 30);
    }

    #[test]
    fn invalid_toml_returns_default() {
        let temp = std::env::temp_dir().join("ticktop_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&temp);
        assert_eq!(config.general.top_processes, 30);
        let _ = std::fs::remove_file(&temp);
    }
}
