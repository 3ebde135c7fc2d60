mod action;
mod app;
mod event;
mod logging;
mod ui;

use std::io::{Write, stdout};
use std::path::PathBuf;

use app::App;
use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::cursor::MoveTo;
use crossterm::event::KeyEventKind;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use event::{Event, EventHandler};
use ticktop::config::{Config, load_config, load_config_from_path};
use ticktop::report::{self, ReportColors};
use ticktop::system::collector::Collector;

#[derive(Parser)]
#[command(
    name = "ticktop",
    about = "Terminal system monitor with per-process CPU rates"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of processes to list
    #[arg(long)]
    top: Option<usize>,

    /// Aggregate CPU sampling window in milliseconds
    #[arg(long)]
    cpu_sample_ms: Option<u64>,

    /// Pause between cycles in milliseconds
    #[arg(long)]
    refresh_pause_ms: Option<u64>,

    /// Proc filesystem mount point
    #[arg(long)]
    proc_root: Option<PathBuf>,

    /// Print a refreshing plain-text report instead of the interactive UI.
    #[arg(long, default_value_t = false)]
    plain: bool,

    /// Print a single report and exit.
    #[arg(long, default_value_t = false)]
    once: bool,

    /// With --once, print the snapshot as JSON.
    #[arg(long, default_value_t = false, requires = "once")]
    json: bool,

    /// Write JSON-lines logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter, e.g. `info` or `ticktop=debug`.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli)?;

    if let Some(path) = &config.logging.file {
        logging::init_file_logging(path, &config.logging.level)?;
    }
    tracing::info!(
        proc_root = %config.general.proc_root.display(),
        top = config.general.top_processes,
        "starting"
    );

    if cli.once {
        return run_once(&config, cli.json);
    }
    if cli.plain {
        return run_plain(&config);
    }

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = run(&mut terminal, &config).await;

    ratatui::restore();

    result
}

async fn run(terminal: &mut ratatui::DefaultTerminal, config: &Config) -> Result<()> {
    let pause = config.refresh_pause();
    let mut app = App::new(config);
    let mut events = EventHandler::new();
    let mut next_refresh = tokio::time::Instant::now();
    let mut force_refresh = false;

    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Event::Key(key)) => {
                        if key.kind == KeyEventKind::Press {
                            let action = app.map_key(key);
                            app.dispatch(action);
                        }
                    }
                    Some(Event::Resize) => {}
                    None => break,
                }
                if app.take_refresh_request() {
                    force_refresh = true;
                    next_refresh = tokio::time::Instant::now();
                }
                terminal.draw(|frame| ui::draw(frame, &app))?;
            }
            _ = tokio::time::sleep_until(next_refresh), if force_refresh || !app.paused => {
                force_refresh = false;
                app.refresh_data().await;
                terminal.draw(|frame| ui::draw(frame, &app))?;
                next_refresh = tokio::time::Instant::now() + pause;
            }
        }
    }

    Ok(())
}

/// Blocking loop: sample, clear the screen, print, pause.
fn run_plain(config: &Config) -> Result<()> {
    let mut collector = Collector::new(&config.collector_settings());
    let pause = config.refresh_pause();
    let colors = ReportColors::from_config(&config.colors);
    let mut out = stdout();

    loop {
        let snapshot = collector.refresh_blocking();
        let text = report::render_plain(&snapshot, collector.limit(), Some(&colors));
        execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        out.write_all(text.as_bytes())?;
        out.flush()?;
        std::thread::sleep(pause);
    }
}

fn run_once(config: &Config, json: bool) -> Result<()> {
    let mut collector = Collector::new(&config.collector_settings());
    let snapshot = collector.refresh_blocking();
    let text = if json {
        report::render_json(&snapshot)?
    } else {
        report::render_plain(&snapshot, collector.limit(), None)
    };
    println!("{}", text.trim_end());
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(top) = cli.top {
        if top == 0 {
            return Err(eyre!("--top must be greater than 0"));
        }
        config.general.top_processes = top;
    }
    if let Some(ms) = cli.cpu_sample_ms {
        config.general.cpu_sample_ms = ms;
    }
    if let Some(ms) = cli.refresh_pause_ms {
        config.general.refresh_pause_ms = ms;
    }
    if let Some(ref root) = cli.proc_root {
        config.general.proc_root = root.clone();
    }
    if let Some(ref path) = cli.log_file {
        config.logging.file = Some(path.clone());
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    Ok(config)
}
