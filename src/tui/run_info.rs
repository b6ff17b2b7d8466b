use crate::app::AppState;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let title = match &state.selection.run {
        Some(run_id) => format!(" Run Info: {run_id} "),
        None => " Run Info ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let label_width = state
        .run_info
        .iter()
        .map(|(l, _)| UnicodeWidthStr::width(l.as_str()))
        .max()
        .unwrap_or(0);

    let lines: Vec<Line> = state
        .run_info
        .iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(
                    format!("{label:>label_width$}  "),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(value.as_str(), value_style(label, value)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn value_style(label: &str, value: &str) -> Style {
    if label != "Status" {
        return Style::default().fg(Color::White);
    }
    let color = match value {
        "SUCCESS" => Color::Green,
        "FAILURE" | "CANCELED" => Color::Red,
        "STARTED" | "STARTING" | "CANCELING" => Color::Yellow,
        _ => Color::Gray,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}
