use crate::app::{AppState, NARROW_WIDTH_THRESHOLD};
use crate::focus::{Focus, Modal, Pane};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

fn hints(focus: Focus, narrow: bool) -> &'static [(&'static str, &'static str)] {
    match focus {
        Focus::Modal(Modal::LaunchEditor) => &[("Ctrl+L", "launch"), ("Ctrl+/", "comment"), ("Esc", "cancel")],
        Focus::Modal(Modal::Filter) => &[("Enter", "apply"), ("Esc", "close")],
        Focus::Modal(Modal::Confirmation) => &[("↑↓", "choose"), ("Enter", "select"), ("y/n", "yes/no")],
        Focus::Modal(Modal::Feedback | Modal::KeyMapHelp) => &[("Esc", "close"), ("q", "quit")],
        Focus::Pane(_) if narrow => &[("↑↓←→", "nav"), ("Enter", "open"), ("x", "keys"), ("q", "quit")],
        Focus::Pane(Pane::Repositories) => &[
            ("↑↓", "navigate"),
            ("←→", "pane"),
            ("Enter", "jobs"),
            ("f", "filter"),
            ("O", "browser"),
            ("x", "keys"),
            ("q", "quit"),
        ],
        Focus::Pane(Pane::Jobs) => &[
            ("↑↓", "navigate"),
            ("←→", "pane"),
            ("Enter", "runs"),
            ("l", "launch"),
            ("O", "browser"),
            ("x", "keys"),
            ("q", "quit"),
        ],
        Focus::Pane(Pane::Runs) => &[
            ("↑↓", "navigate"),
            ("←→", "pane"),
            ("l", "relaunch"),
            ("t/T", "terminate"),
            ("O", "browser"),
            ("x", "keys"),
            ("q", "quit"),
        ],
    }
}

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let narrow = area.width < NARROW_WIDTH_THRESHOLD;

    let line = if let Some(notif) = state.notifications.last() {
        Line::from(vec![
            Span::styled("★ ", Style::default().fg(Color::Yellow)),
            Span::styled(notif.message.as_str(), Style::default().fg(Color::Yellow)),
        ])
    } else {
        let mut spans: Vec<Span> = Vec::new();
        for (i, (key, desc)) in hints(state.focus.current(), narrow).iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
            spans.push(Span::styled(
                format!(" {desc}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    };

    let footer = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}
