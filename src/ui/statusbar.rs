use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ui::palette::Palette;

pub struct StatusInfo<'a> {
    pub paused: bool,
    pub message: Option<&'a str>,
    pub process_total: usize,
    pub tracked: usize,
}

pub fn render(frame: &mut Frame, area: Rect, info: &StatusInfo, palette: &Palette) {
    // Status message takes priority
    if let Some(msg) = info.message {
        let line = Line::from(Span::styled(
            format!(" {msg}"),
            Style::default()
                .fg(palette.status)
                .add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let mut spans = Vec::new();
    spans.extend(pill_spans("q", "Quit", palette));
    spans.extend(pill_spans("+/-", "Rows", palette));
    spans.extend(pill_spans(
        "p",
        if info.paused { "Resume" } else { "Pause" },
        palette,
    ));
    spans.extend(pill_spans("r", "Refresh", palette));
    spans.push(Span::styled(
        format!(
            "  {} procs, {} tracked{}",
            info.process_total,
            info.tracked,
            if info.paused { ", PAUSED" } else { "" }
        ),
        Style::default().fg(palette.label),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn pill_spans<'a>(key: &'a str, desc: &'a str, palette: &Palette) -> Vec<Span<'a>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(palette.pill_key_fg)
                .bg(palette.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {desc}"), Style::default().fg(palette.label)),
    ]
}
