//! Which pane or modal receives key input.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Repositories,
    Jobs,
    Runs,
}

impl Pane {
    pub fn next(self) -> Self {
        match self {
            Pane::Repositories => Pane::Jobs,
            Pane::Jobs => Pane::Runs,
            Pane::Runs => Pane::Repositories,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Pane::Repositories => Pane::Runs,
            Pane::Jobs => Pane::Repositories,
            Pane::Runs => Pane::Jobs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modal {
    KeyMapHelp,
    LaunchEditor,
    Filter,
    Confirmation,
    Feedback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Pane(Pane),
    Modal(Modal),
}

/// Focus plus a stack of what was focused before each open modal.
///
/// The bottom of the stack is always a pane, so closing every modal lands back
/// on the pane the user came from.
#[derive(Debug, Clone)]
pub struct FocusController {
    current: Focus,
    stack: Vec<Focus>,
}

impl Default for FocusController {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusController {
    pub fn new() -> Self {
        Self {
            current: Focus::Pane(Pane::Repositories),
            stack: Vec::new(),
        }
    }

    pub fn current(&self) -> Focus {
        self.current
    }

    /// The pane holding focus, or `None` while a modal is open.
    pub fn focused_pane(&self) -> Option<Pane> {
        match self.current {
            Focus::Pane(p) => Some(p),
            Focus::Modal(_) => None,
        }
    }

    pub fn is_active(&self, pane: Pane) -> bool {
        self.current == Focus::Pane(pane)
    }

    pub fn top_modal(&self) -> Option<Modal> {
        match self.current {
            Focus::Modal(m) => Some(m),
            Focus::Pane(_) => None,
        }
    }

    /// Open modals from bottom to top.
    pub fn modals(&self) -> impl Iterator<Item = Modal> + '_ {
        self.stack
            .iter()
            .chain(std::iter::once(&self.current))
            .filter_map(|f| match f {
                Focus::Modal(m) => Some(*m),
                Focus::Pane(_) => None,
            })
    }

    pub fn focus_next(&mut self) {
        if let Focus::Pane(p) = self.current {
            self.current = Focus::Pane(p.next());
        }
    }

    pub fn focus_previous(&mut self) {
        if let Focus::Pane(p) = self.current {
            self.current = Focus::Pane(p.previous());
        }
    }

    /// Focus a pane. With modals open, the pane beneath them changes instead.
    pub fn focus(&mut self, pane: Pane) {
        match self.stack.first_mut() {
            Some(base) => *base = Focus::Pane(pane),
            None => self.current = Focus::Pane(pane),
        }
    }

    pub fn open_modal(&mut self, modal: Modal) {
        if self.current == Focus::Modal(modal) {
            return;
        }
        self.stack.push(self.current);
        self.current = Focus::Modal(modal);
    }

    /// Close the top modal and restore what was focused before it.
    pub fn close_modal(&mut self) -> Option<Modal> {
        let Focus::Modal(closed) = self.current else {
            return None;
        };
        self.current = self.stack.pop().unwrap_or(Focus::Pane(Pane::Repositories));
        Some(closed)
    }

    /// Remove a modal wherever it sits in the stack.
    pub fn dismiss(&mut self, modal: Modal) {
        if self.current == Focus::Modal(modal) {
            self.close_modal();
        } else {
            self.stack.retain(|f| *f != Focus::Modal(modal));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn panes_cycle_both_ways() {
        let mut f = FocusController::new();
        f.focus_next();
        assert!(f.is_active(Pane::Jobs));
        f.focus_next();
        f.focus_next();
        assert!(f.is_active(Pane::Repositories));
        f.focus_previous();
        assert!(f.is_active(Pane::Runs));
    }

    #[test]
    fn closing_modals_restores_pane() {
        let mut f = FocusController::new();
        f.focus(Pane::Runs);
        f.open_modal(Modal::LaunchEditor);
        f.open_modal(Modal::Feedback);
        assert_eq!(f.top_modal(), Some(Modal::Feedback));
        assert_eq!(f.close_modal(), Some(Modal::Feedback));
        assert_eq!(f.current(), Focus::Modal(Modal::LaunchEditor));
        assert_eq!(f.close_modal(), Some(Modal::LaunchEditor));
        assert_eq!(f.current(), Focus::Pane(Pane::Runs));
        assert_eq!(f.close_modal(), None);
    }

    #[test]
    fn pane_cycling_ignored_inside_modal() {
        let mut f = FocusController::new();
        f.open_modal(Modal::KeyMapHelp);
        f.focus_next();
        assert_eq!(f.current(), Focus::Modal(Modal::KeyMapHelp));
    }

    #[test]
    fn focus_under_modal_changes_base() {
        let mut f = FocusController::new();
        f.open_modal(Modal::KeyMapHelp);
        f.focus(Pane::Jobs);
        assert_eq!(f.top_modal(), Some(Modal::KeyMapHelp));
        f.close_modal();
        assert!(f.is_active(Pane::Jobs));
    }

    #[test]
    fn reopening_top_modal_does_not_stack() {
        let mut f = FocusController::new();
        f.open_modal(Modal::Feedback);
        f.open_modal(Modal::Feedback);
        f.close_modal();
        assert_eq!(f.focused_pane(), Some(Pane::Repositories));
    }

    #[test]
    fn dismiss_buried_modal() {
        let mut f = FocusController::new();
        f.focus(Pane::Jobs);
        f.open_modal(Modal::LaunchEditor);
        f.open_modal(Modal::KeyMapHelp);
        f.dismiss(Modal::LaunchEditor);
        assert_eq!(f.modals().collect::<Vec<_>>(), vec![Modal::KeyMapHelp]);
        f.close_modal();
        assert!(f.is_active(Pane::Jobs));
    }
}
