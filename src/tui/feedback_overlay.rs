use crate::app::FeedbackOverlay;
use crate::tui::centered;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub fn render(f: &mut Frame, overlay: &FeedbackOverlay) {
    let screen = f.area();
    let width = (screen.width * 6 / 10).max(40);
    // Two rows per line leaves room for wrapping.
    let wanted = u16::try_from(overlay.lines.len() * 2 + 2).unwrap_or(u16::MAX);
    let area = centered(screen, width, wanted.max(5));
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", overlay.title))
        .title_bottom(Line::from(" Esc close ").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .style(Style::default().bg(Color::Black));

    let lines: Vec<Line> = overlay.lines.iter().map(|l| Line::from(l.as_str())).collect();
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
