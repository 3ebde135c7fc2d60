use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::Action;
use crate::ui::palette::Palette;
use ticktop::config::Config;
use ticktop::system::collector::Collector;
use ticktop::system::snapshot::SystemSnapshot;

pub const MAX_LIMIT: usize = 500;
const STATUS_TTL: Duration = Duration::from_secs(3);

pub struct App {
    pub running: bool,
    pub paused: bool,
    pub collector: Collector,
    pub snapshot: SystemSnapshot,
    pub palette: Palette,
    pub status_message: Option<(String, Instant)>,
    pub cycles: u64,
    refresh_requested: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let settings = config.collector_settings();
        let palette = Palette::from_config(&config.colors);

        App {
            running: true,
            paused: false,
            collector: Collector::new(&settings),
            snapshot: SystemSnapshot::default(),
            palette,
            status_message: None,
            cycles: 0,
            refresh_requested: false,
        }
    }

    /// One sampling cycle. The aggregate CPU wait is an async sleep so
    /// terminal input keeps queueing while it runs.
    pub async fn refresh_data(&mut self) {
        let before = self.collector.begin_cycle();
        tokio::time::sleep(self.collector.cpu_sample_interval()).await;
        self.snapshot = self.collector.finish_cycle(before);
        self.cycles += 1;

        if let Some((_, created)) = &self.status_message
            && created.elapsed() >= STATUS_TTL
        {
            self.status_message = None;
        }
    }

    pub fn limit(&self) -> usize {
        self.collector.limit()
    }

    pub fn take_refresh_request(&mut self) -> bool {
        std::mem::take(&mut self.refresh_requested)
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            KeyCode::Char('+') | KeyCode::Char('=') => Action::GrowLimit,
            KeyCode::Char('-') => Action::ShrinkLimit,
            KeyCode::Char('p') | KeyCode::Char(' ') => Action::TogglePause,
            KeyCode::Char('r') => Action::Refresh,
            _ => Action::None,
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::GrowLimit => {
                let limit = (self.limit() + 1).min(MAX_LIMIT);
                self.collector.set_limit(limit);
                self.set_status(format!("Showing top {limit}"));
            }
            Action::ShrinkLimit => {
                let limit = self.limit().saturating_sub(1).max(1);
                self.collector.set_limit(limit);
                self.snapshot.processes.truncate(limit);
                self.set_status(format!("Showing top {limit}"));
            }
            Action::TogglePause => {
                self.paused = !self.paused;
                let msg = if self.paused {
                    "Sampling paused"
                } else {
                    "Sampling resumed"
                };
                self.set_status(msg.to_string());
            }
            Action::Refresh => self.refresh_requested = true,
            Action::None => {}
        }
    }

    fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }
}
