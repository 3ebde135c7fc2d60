use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::ui::palette::Palette;
use ticktop::format::{format_load, format_memory, format_uptime};
use ticktop::system::snapshot::SystemSnapshot;

pub const HEIGHT: u16 = 7;

pub fn render(frame: &mut Frame, area: Rect, snapshot: &SystemSnapshot, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .title(Span::styled(
            " ticktop ",
            Style::default()
                .fg(palette.title)
                .add_modifier(Modifier::BOLD),
        ));

    let counts = snapshot.process_counts;
    let lines = vec![
        field_line("CPU Usage", format!("{:.2}%", snapshot.cpu.percentage), palette),
        field_line("Memory Usage", format_memory(snapshot.memory), palette),
        field_line("Uptime", format_uptime(snapshot.uptime), palette),
        field_line("Load Average", format_load(snapshot.load_average), palette),
        field_line(
            "Processes",
            format!(
                "{} running, {} since boot, most recent PID {}",
                counts.running, counts.total_since_boot, counts.most_recent_pid
            ),
            palette,
        ),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_line<'a>(label: &'a str, value: String, palette: &Palette) -> Line<'a> {
    Line::from(vec![
        Span::styled(
            format!(" {label}: "),
            Style::default()
                .fg(palette.label)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(value),
    ])
}
