//! Screen geometry shared by rendering and cursor viewport sizing.

use crate::app::AppState;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub filter: Rect,
    pub header: Rect,
    pub repositories: Rect,
    pub jobs: Rect,
    pub runs: Rect,
    pub run_info: Rect,
    pub footer: Rect,
}

pub fn compute(area: Rect) -> Areas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // filter bar + environment
            Constraint::Min(3),    // panes
            Constraint::Length(2), // footer
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(50),
        ])
        .split(rows[1]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(columns[2]);

    Areas {
        filter: top[0],
        header: top[1],
        repositories: columns[0],
        jobs: columns[1],
        runs: right[0],
        run_info: right[1],
        footer: rows[2],
    }
}

/// Rows available for list items inside a bordered pane.
pub fn viewport_height(pane: Rect) -> usize {
    pane.height.saturating_sub(2) as usize
}

/// Size every list cursor to the panes it will be drawn in.
pub fn fit_viewports(state: &mut AppState, area: Rect) {
    let areas = compute(area);
    state.set_viewport_heights(
        viewport_height(areas.repositories),
        viewport_height(areas.jobs),
        viewport_height(areas.runs),
    );
}
