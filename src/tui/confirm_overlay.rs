use crate::app::{ConfirmChoice, ConfirmOverlay};
use crate::tui::centered;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

fn option(label: &'static str, selected: bool, color: Color) -> Span<'static> {
    if selected {
        Span::styled(
            format!("[ {label} ]"),
            Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(format!("  {label}  "), Style::default().fg(Color::DarkGray))
    }
}

pub fn render(f: &mut Frame, overlay: &ConfirmOverlay) {
    let width = (overlay.message.chars().count() as u16).saturating_add(6).max(40);
    let area = centered(f.area(), width, 7);
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", overlay.title))
        .title_bottom(Line::from(" ↑↓ choose  Enter select ").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let choices = Line::from(vec![
        option("Yes", overlay.choice == ConfirmChoice::Yes, Color::Red),
        Span::raw("   "),
        option("No", overlay.choice == ConfirmChoice::No, Color::Green),
    ]);

    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(overlay.message.as_str(), Style::default().fg(Color::White))),
        Line::from(""),
        choices,
    ])
    .block(block)
    .centered();
    f.render_widget(paragraph, area);
}
