use crate::app::LaunchEditor;
use crate::tui::{centered, truncate};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

/// First buffer line to show so that `row` stays inside a viewport of `height` lines.
pub fn scroll_offset(row: usize, height: usize) -> usize {
    if height == 0 {
        return row;
    }
    row.saturating_sub(height - 1)
}

pub fn render(f: &mut Frame, editor: &LaunchEditor, has_focus: bool) {
    let screen = f.area();
    let area = centered(screen, screen.width * 8 / 10, screen.height * 7 / 10);
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" Launch {} ({}) ", editor.job, editor.repository.location))
        .title_bottom(Line::from(" Ctrl+L launch  Ctrl+/ comment  Esc cancel ").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .style(Style::default().bg(Color::Black));

    let inner_height = area.height.saturating_sub(2) as usize;
    let inner_width = area.width.saturating_sub(2) as usize;
    let (row, col) = editor.buffer.cursor();
    let top = scroll_offset(row, inner_height);

    let lines: Vec<Line> = editor
        .buffer
        .lines()
        .iter()
        .enumerate()
        .skip(top)
        .take(inner_height)
        .map(|(i, text)| {
            let style = if i == row {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else if text.trim_start().starts_with('#') {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            Line::from(Span::styled(
                format!("{:<inner_width$}", truncate(text, inner_width)),
                style,
            ))
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);

    if has_focus && inner_width > 0 && inner_height > 0 {
        let before: String = editor.buffer.lines()[row].chars().take(col).collect();
        let x = UnicodeWidthStr::width(before.as_str()).min(inner_width - 1) as u16;
        let y = (row - top) as u16;
        f.set_cursor_position((area.x + 1 + x, area.y + 1 + y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_keeps_cursor_visible() {
        assert_eq!(scroll_offset(0, 10), 0);
        assert_eq!(scroll_offset(9, 10), 0);
        assert_eq!(scroll_offset(10, 10), 1);
        assert_eq!(scroll_offset(25, 10), 16);
    }
}
