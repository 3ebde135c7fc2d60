pub mod header;
pub mod palette;
pub mod process_table;
pub mod statusbar;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header::HEIGHT),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(frame, chunks[0], &app.snapshot, &app.palette);
    process_table::render(
        frame,
        chunks[1],
        &app.snapshot.processes,
        app.limit(),
        &app.palette,
    );

    let info = statusbar::StatusInfo {
        paused: app.paused,
        message: app.status_message.as_ref().map(|(msg, _)| msg.as_str()),
        process_total: app.snapshot.process_total,
        tracked: app.collector.tracked_processes(),
    };
    statusbar::render(frame, chunks[2], &info, &app.palette);
}
