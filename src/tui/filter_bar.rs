use crate::app::AppState;
use crate::focus::Modal;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let editing = state.focus.top_modal() == Some(Modal::Filter);
    let term = state.repo_filter.as_str();

    let (title, border) = if editing {
        (" Filter Repositories ", Style::default().fg(Color::Yellow))
    } else {
        (" Filter ", Style::default().fg(Color::DarkGray))
    };

    let line = if state.repo_filter.is_empty() && !editing {
        Line::from(Span::styled("f to filter", Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(Span::styled(term, Style::default().fg(Color::White)))
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border);
    f.render_widget(Paragraph::new(line).block(block), area);

    if editing && area.width > 2 && area.height > 2 {
        let offset = UnicodeWidthStr::width(term).min(area.width.saturating_sub(3) as usize) as u16;
        f.set_cursor_position((area.x + 1 + offset, area.y + 1));
    }
}
