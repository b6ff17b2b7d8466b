use crate::focus::{Focus, Modal, Pane};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    FocusPrevious,
    FocusNext,
    Select,
    OpenHelp,
    OpenBrowser,
    OpenFilter,
    OpenLaunchEditor,
    TerminateWithConfirmation,
    TerminateNow,
    CloseModal,
    EditorInsert(char),
    EditorIndent,
    EditorNewline,
    EditorBackspace,
    EditorDelete,
    EditorLeft,
    EditorRight,
    EditorUp,
    EditorDown,
    ToggleComment,
    SubmitLaunch,
    FilterInput(char),
    FilterBackspace,
    ApplyFilter,
    ConfirmToggle,
    ConfirmSubmit,
    ConfirmYes,
    ConfirmNo,
    None,
}

/// Captures the UI state needed to interpret a key press.
#[derive(Debug, Clone, Copy)]
pub struct InputContext {
    pub focus: Focus,
}

fn ctrl(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
}

fn plain_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => Some(c),
        _ => None,
    }
}

fn is_close(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc || (ctrl(key) && key.code == KeyCode::Char('x'))
}

pub fn map_key(key: KeyEvent, ctx: &InputContext) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    // Ctrl+C always quits
    if ctrl(&key) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match ctx.focus {
        Focus::Modal(Modal::LaunchEditor) => map_editor(key),
        Focus::Modal(Modal::Filter) => map_filter(key),
        Focus::Modal(Modal::Confirmation) => map_confirmation(key),
        Focus::Modal(Modal::Feedback) => {
            if is_close(&key) || key.code == KeyCode::Enter {
                return Action::CloseModal;
            }
            map_global(key)
        }
        Focus::Modal(Modal::KeyMapHelp) => {
            if is_close(&key) {
                return Action::CloseModal;
            }
            match key.code {
                KeyCode::Char('q') => Action::Quit,
                _ => Action::None,
            }
        }
        Focus::Pane(pane) => map_pane(key, pane),
    }
}

fn map_global(key: KeyEvent) -> Action {
    match plain_char(&key) {
        Some('q') => Action::Quit,
        Some('x') => Action::OpenHelp,
        _ => Action::None,
    }
}

fn map_pane(key: KeyEvent, pane: Pane) -> Action {
    match key.code {
        KeyCode::Up => return Action::MoveUp,
        KeyCode::Down => return Action::MoveDown,
        KeyCode::Left => return Action::FocusPrevious,
        KeyCode::Right => return Action::FocusNext,
        KeyCode::Enter => return Action::Select,
        _ => {}
    }
    match (plain_char(&key), pane) {
        (Some('O'), _) => Action::OpenBrowser,
        (Some('f'), Pane::Repositories) => Action::OpenFilter,
        (Some('l' | 'L'), Pane::Jobs | Pane::Runs) => Action::OpenLaunchEditor,
        (Some('t'), Pane::Runs) => Action::TerminateWithConfirmation,
        (Some('T'), Pane::Runs) => Action::TerminateNow,
        _ => map_global(key),
    }
}

fn map_editor(key: KeyEvent) -> Action {
    if is_close(&key) {
        return Action::CloseModal;
    }
    if ctrl(&key) {
        return match key.code {
            KeyCode::Char('l') => Action::SubmitLaunch,
            // Terminals report Ctrl+/ as '/', '7' or '_'.
            KeyCode::Char('/' | '7' | '_') => Action::ToggleComment,
            _ => Action::None,
        };
    }
    match key.code {
        KeyCode::Enter => Action::EditorNewline,
        KeyCode::Backspace => Action::EditorBackspace,
        KeyCode::Delete => Action::EditorDelete,
        KeyCode::Left => Action::EditorLeft,
        KeyCode::Right => Action::EditorRight,
        KeyCode::Up => Action::EditorUp,
        KeyCode::Down => Action::EditorDown,
        KeyCode::Tab => Action::EditorIndent,
        _ => plain_char(&key).map_or(Action::None, Action::EditorInsert),
    }
}

fn map_filter(key: KeyEvent) -> Action {
    if is_close(&key) {
        return Action::CloseModal;
    }
    match key.code {
        KeyCode::Enter | KeyCode::Down => Action::ApplyFilter,
        KeyCode::Backspace => Action::FilterBackspace,
        _ => plain_char(&key).map_or(Action::None, Action::FilterInput),
    }
}

fn map_confirmation(key: KeyEvent) -> Action {
    if is_close(&key) {
        return Action::CloseModal;
    }
    match key.code {
        KeyCode::Up | KeyCode::Down | KeyCode::Tab => Action::ConfirmToggle,
        KeyCode::Enter => Action::ConfirmSubmit,
        KeyCode::Char('y' | 'Y') => Action::ConfirmYes,
        KeyCode::Char('n' | 'N') => Action::ConfirmNo,
        _ => map_global(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
    use pretty_assertions::assert_eq;

    fn press(code: KeyCode) -> KeyEvent {
        press_with(code, KeyModifiers::NONE)
    }

    fn press_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn in_pane(pane: Pane) -> InputContext {
        InputContext { focus: Focus::Pane(pane) }
    }

    fn in_modal(modal: Modal) -> InputContext {
        InputContext { focus: Focus::Modal(modal) }
    }

    #[test]
    fn arrows_in_panes() {
        let ctx = in_pane(Pane::Jobs);
        assert_eq!(map_key(press(KeyCode::Up), &ctx), Action::MoveUp);
        assert_eq!(map_key(press(KeyCode::Down), &ctx), Action::MoveDown);
        assert_eq!(map_key(press(KeyCode::Left), &ctx), Action::FocusPrevious);
        assert_eq!(map_key(press(KeyCode::Right), &ctx), Action::FocusNext);
        assert_eq!(map_key(press(KeyCode::Enter), &ctx), Action::Select);
    }

    #[test]
    fn q_quits_from_pane() {
        assert_eq!(map_key(press(KeyCode::Char('q')), &in_pane(Pane::Runs)), Action::Quit);
    }

    #[test]
    fn ctrl_c_quits_everywhere() {
        let key = press_with(KeyCode::Char('c'), KeyModifiers::CONTROL);
        for ctx in [
            in_pane(Pane::Repositories),
            in_modal(Modal::LaunchEditor),
            in_modal(Modal::Filter),
            in_modal(Modal::Confirmation),
        ] {
            assert_eq!(map_key(key, &ctx), Action::Quit);
        }
    }

    #[test]
    fn q_is_text_in_editor_and_filter() {
        assert_eq!(
            map_key(press(KeyCode::Char('q')), &in_modal(Modal::LaunchEditor)),
            Action::EditorInsert('q')
        );
        assert_eq!(
            map_key(press(KeyCode::Char('q')), &in_modal(Modal::Filter)),
            Action::FilterInput('q')
        );
    }

    #[test]
    fn filter_only_on_repositories() {
        assert_eq!(map_key(press(KeyCode::Char('f')), &in_pane(Pane::Repositories)), Action::OpenFilter);
        assert_eq!(map_key(press(KeyCode::Char('f')), &in_pane(Pane::Jobs)), Action::None);
    }

    #[test]
    fn launch_editor_from_jobs_and_runs() {
        assert_eq!(map_key(press(KeyCode::Char('l')), &in_pane(Pane::Jobs)), Action::OpenLaunchEditor);
        assert_eq!(map_key(press(KeyCode::Char('L')), &in_pane(Pane::Runs)), Action::OpenLaunchEditor);
        assert_eq!(map_key(press(KeyCode::Char('l')), &in_pane(Pane::Repositories)), Action::None);
    }

    #[test]
    fn terminate_only_on_runs() {
        assert_eq!(
            map_key(press(KeyCode::Char('t')), &in_pane(Pane::Runs)),
            Action::TerminateWithConfirmation
        );
        assert_eq!(map_key(press(KeyCode::Char('T')), &in_pane(Pane::Runs)), Action::TerminateNow);
        assert_eq!(map_key(press(KeyCode::Char('t')), &in_pane(Pane::Jobs)), Action::None);
    }

    #[test]
    fn browser_and_help_everywhere_in_panes() {
        for pane in [Pane::Repositories, Pane::Jobs, Pane::Runs] {
            assert_eq!(map_key(press(KeyCode::Char('O')), &in_pane(pane)), Action::OpenBrowser);
            assert_eq!(map_key(press(KeyCode::Char('x')), &in_pane(pane)), Action::OpenHelp);
        }
    }

    #[test]
    fn editor_bindings() {
        let ctx = in_modal(Modal::LaunchEditor);
        assert_eq!(
            map_key(press_with(KeyCode::Char('l'), KeyModifiers::CONTROL), &ctx),
            Action::SubmitLaunch
        );
        assert_eq!(map_key(press(KeyCode::Enter), &ctx), Action::EditorNewline);
        assert_eq!(map_key(press(KeyCode::Tab), &ctx), Action::EditorIndent);
        assert_eq!(map_key(press(KeyCode::Up), &ctx), Action::EditorUp);
        assert_eq!(
            map_key(press_with(KeyCode::Char('A'), KeyModifiers::SHIFT), &ctx),
            Action::EditorInsert('A')
        );
        assert_eq!(
            map_key(press_with(KeyCode::Char('a'), KeyModifiers::ALT), &ctx),
            Action::None
        );
    }

    #[test]
    fn toggle_comment_variants() {
        let ctx = in_modal(Modal::LaunchEditor);
        for c in ['/', '7', '_'] {
            assert_eq!(
                map_key(press_with(KeyCode::Char(c), KeyModifiers::CONTROL), &ctx),
                Action::ToggleComment
            );
        }
    }

    #[test]
    fn esc_and_ctrl_x_close_modals() {
        for modal in [
            Modal::LaunchEditor,
            Modal::Filter,
            Modal::Confirmation,
            Modal::Feedback,
            Modal::KeyMapHelp,
        ] {
            assert_eq!(map_key(press(KeyCode::Esc), &in_modal(modal)), Action::CloseModal);
            assert_eq!(
                map_key(press_with(KeyCode::Char('x'), KeyModifiers::CONTROL), &in_modal(modal)),
                Action::CloseModal
            );
        }
    }

    #[test]
    fn filter_apply_keys() {
        let ctx = in_modal(Modal::Filter);
        assert_eq!(map_key(press(KeyCode::Enter), &ctx), Action::ApplyFilter);
        assert_eq!(map_key(press(KeyCode::Down), &ctx), Action::ApplyFilter);
        assert_eq!(map_key(press(KeyCode::Backspace), &ctx), Action::FilterBackspace);
    }

    #[test]
    fn confirmation_keys() {
        let ctx = in_modal(Modal::Confirmation);
        assert_eq!(map_key(press(KeyCode::Up), &ctx), Action::ConfirmToggle);
        assert_eq!(map_key(press(KeyCode::Down), &ctx), Action::ConfirmToggle);
        assert_eq!(map_key(press(KeyCode::Enter), &ctx), Action::ConfirmSubmit);
        assert_eq!(map_key(press(KeyCode::Char('y')), &ctx), Action::ConfirmYes);
        assert_eq!(map_key(press(KeyCode::Char('n')), &ctx), Action::ConfirmNo);
    }

    #[test]
    fn help_opens_over_feedback_but_not_twice() {
        assert_eq!(map_key(press(KeyCode::Char('x')), &in_modal(Modal::Feedback)), Action::OpenHelp);
        assert_eq!(map_key(press(KeyCode::Char('x')), &in_modal(Modal::KeyMapHelp)), Action::None);
    }

    #[test]
    fn feedback_enter_closes() {
        assert_eq!(map_key(press(KeyCode::Enter), &in_modal(Modal::Feedback)), Action::CloseModal);
    }

    #[test]
    fn non_press_event_filtered() {
        let key = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key(key, &in_pane(Pane::Repositories)), Action::None);
    }
}
