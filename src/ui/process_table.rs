use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table};

use crate::ui::palette::Palette;
use ticktop::format::truncate_unicode;
use ticktop::system::snapshot::RankedProcess;

const PID_WIDTH: u16 = 8;
const CPU_WIDTH: u16 = 8;
const MEM_WIDTH: u16 = 10;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    processes: &[RankedProcess],
    limit: usize,
    palette: &Palette,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .title(Span::styled(
            format!(" Top {limit} processes by CPU usage "),
            Style::default()
                .fg(palette.title)
                .add_modifier(Modifier::BOLD),
        ));

    // Borders plus the three gaps between columns.
    let command_width = area
        .width
        .saturating_sub(PID_WIDTH + CPU_WIDTH + MEM_WIDTH + 2 + 3) as usize;

    let header = Row::new(vec![
        Cell::from("PID"),
        Cell::from("CPU%"),
        Cell::from("MEM (MB)"),
        Cell::from("Command"),
    ])
    .style(
        Style::default()
            .fg(palette.header)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = processes
        .iter()
        .take(limit)
        .map(|p| {
            Row::new(vec![
                Cell::from(format!("{:>7}", p.identity.pid)),
                Cell::from(format!("{:>6.1}%", p.cpu_percent)),
                Cell::from(format!("{:>9.1}", p.memory_mb)),
                Cell::from(truncate_unicode(&p.identity.command, command_width)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(PID_WIDTH),
            Constraint::Length(CPU_WIDTH),
            Constraint::Length(MEM_WIDTH),
            Constraint::Min(1),
        ],
    )
    .header(header)
    .column_spacing(1)
    .block(block);

    frame.render_widget(table, area);
}
