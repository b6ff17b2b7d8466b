use crate::app::AppState;
use crate::focus::{Modal, Pane};
use crate::tui::{
    confirm_overlay, feedback_overlay, filter_bar, footer, header, keymap_overlay, launch_overlay, layout,
    list_pane, run_info, spinner,
};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render(f: &mut Frame, state: &AppState) {
    let areas = layout::compute(f.area());
    let loading = |pane: Pane| state.is_loading(pane).then(|| spinner(state.spinner_frame));

    filter_bar::render(f, areas.filter, state);
    header::render(f, areas.header, state);
    list_pane::render(
        f,
        areas.repositories,
        &state.repositories,
        state.focus.is_active(Pane::Repositories),
        loading(Pane::Repositories),
    );
    list_pane::render(
        f,
        areas.jobs,
        &state.jobs,
        state.focus.is_active(Pane::Jobs),
        loading(Pane::Jobs),
    );
    list_pane::render(
        f,
        areas.runs,
        &state.runs,
        state.focus.is_active(Pane::Runs),
        loading(Pane::Runs),
    );
    run_info::render(f, areas.run_info, state);
    footer::render(f, areas.footer, state);

    if let Some(err) = state.error_message() {
        render_error(f, err);
    }

    // Modals bottom to top so the focused one is drawn last.
    let top = state.focus.top_modal();
    for modal in state.focus.modals() {
        match modal {
            Modal::KeyMapHelp => keymap_overlay::render(f),
            Modal::LaunchEditor => {
                if let Some(editor) = &state.editor {
                    launch_overlay::render(f, editor, top == Some(Modal::LaunchEditor));
                }
            }
            Modal::Confirmation => {
                if let Some(confirm) = &state.confirm {
                    confirm_overlay::render(f, confirm);
                }
            }
            Modal::Feedback => {
                if let Some(feedback) = &state.feedback {
                    feedback_overlay::render(f, feedback);
                }
            }
            // Drawn in place by the filter bar.
            Modal::Filter => {}
        }
    }
}

fn render_error(f: &mut Frame, err: &str) {
    let area = f.area();
    if area.height <= 6 || area.width < 4 {
        return;
    }
    let err_area = Rect {
        x: area.x + 1,
        y: area.y + area.height.saturating_sub(5),
        width: area.width.saturating_sub(2),
        height: 3,
    };
    let widget = Paragraph::new(err)
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .title(" Error ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(widget, err_area);
}
