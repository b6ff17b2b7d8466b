use crate::nav::ListPane;
use crate::tui::truncate;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Draw a list pane. `loading` carries the spinner frame while a fetch for it is running.
pub fn render<T>(f: &mut Frame, area: Rect, pane: &ListPane<T>, active: bool, loading: Option<char>) {
    let border = if active {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = match loading {
        Some(frame) => format!(" {} {frame} ", pane.title()),
        None => format!(" {} ", pane.title()),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border);

    let inner_width = area.width.saturating_sub(2) as usize;
    let (labels, highlight) = pane.visible_labels();

    let lines: Vec<Line> = if labels.is_empty() {
        let placeholder = if loading.is_some() { "loading…" } else { "(empty)" };
        vec![Line::from(Span::styled(
            placeholder,
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        labels
            .iter()
            .enumerate()
            .map(|(row, label)| {
                let text = format!("{:<inner_width$}", truncate(label, inner_width));
                let style = match (Some(row) == highlight, active) {
                    (true, true) => Style::default()
                        .bg(Color::Blue)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                    (true, false) => Style::default().fg(Color::Cyan),
                    _ => Style::default().fg(Color::White),
                };
                Line::from(Span::styled(text, style))
            })
            .collect()
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}
