use crate::app::AppState;
use crate::tui::spinner;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

fn display_url(url: &str) -> &str {
    url.strip_prefix("https://").unwrap_or(url)
}

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", state.config.version_string),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(
            state.config.environment.as_str(),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(" │ "),
        Span::styled(
            display_url(&state.config.backend_url),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ];

    if state.busy {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            spinner(state.spinner_frame).to_string(),
            Style::default().fg(Color::Yellow),
        ));
    }

    if state.error_message().is_some() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            "!",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Environment ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(header, area);
}
