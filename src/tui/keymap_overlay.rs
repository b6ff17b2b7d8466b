use crate::tui::centered;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

const KEY_MAP: &[(&str, &[(&str, &str)])] = &[
    (
        "Global",
        &[
            ("q", "quit"),
            ("Ctrl+C", "quit from anywhere"),
            ("x", "show this key map"),
            ("←/→", "previous / next pane"),
            ("↑/↓", "move cursor"),
            ("O", "open selection in browser"),
            ("Esc / Ctrl+X", "close popup"),
        ],
    ),
    (
        "Repositories",
        &[("Enter", "show jobs"), ("f", "filter by location")],
    ),
    (
        "Jobs",
        &[("Enter", "show runs"), ("l / L", "launch with default config")],
    ),
    (
        "Runs",
        &[
            ("l / L", "launch with this run's config"),
            ("t", "terminate (asks first)"),
            ("T", "terminate now"),
        ],
    ),
    (
        "Launch editor",
        &[
            ("Ctrl+L", "launch run"),
            ("Ctrl+/", "toggle # comment"),
            ("Tab", "indent two spaces"),
        ],
    ),
];

pub fn render(f: &mut Frame) {
    let key_width = KEY_MAP
        .iter()
        .flat_map(|(_, keys)| keys.iter().map(|(k, _)| k.chars().count()))
        .max()
        .unwrap_or(0);

    let mut lines = Vec::new();
    for (i, (section, keys)) in KEY_MAP.iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            *section,
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        for (key, desc) in *keys {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<key_width$}  "), Style::default().fg(Color::Cyan)),
                Span::styled(*desc, Style::default().fg(Color::White)),
            ]));
        }
    }

    let height = (lines.len() as u16).saturating_add(2);
    let area = centered(f.area(), 56, height);
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Key Map ")
        .title_bottom(Line::from(" Esc close ").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));
    f.render_widget(Paragraph::new(lines).block(block), area);
}
