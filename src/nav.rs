//! Cursor and scroll bookkeeping for the three list panes.

use std::cmp::Ordering;

/// Cursor row within a fixed-height viewport plus the index of the first visible item.
///
/// The selected item is `origin + row`. Invariants while the list is non-empty:
/// `row < min(viewport_height, len)` and `origin + min(viewport_height, len) <= len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListCursor {
    row: usize,
    origin: usize,
    viewport_height: usize,
}

impl Default for ListCursor {
    fn default() -> Self {
        Self::new(1)
    }
}

impl ListCursor {
    pub fn new(viewport_height: usize) -> Self {
        Self {
            row: 0,
            origin: 0,
            viewport_height: viewport_height.max(1),
        }
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn origin(&self) -> usize {
        self.origin
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    fn visible(&self, len: usize) -> usize {
        self.viewport_height.min(len)
    }

    pub fn reset(&mut self) {
        self.row = 0;
        self.origin = 0;
    }

    pub fn current_index(&self, len: usize) -> Option<usize> {
        let idx = self.origin + self.row;
        (idx < len).then_some(idx)
    }

    /// Move down one item, scrolling at the bottom edge and wrapping to the top past the last item.
    pub fn move_down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let visible = self.visible(len);
        if self.row + 1 < visible {
            self.row += 1;
        } else if self.origin + self.row + 1 >= len {
            self.reset();
        } else {
            self.origin += 1;
        }
    }

    /// Move up one item, scrolling at the top edge and wrapping to the last item.
    pub fn move_up(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        if self.row > 0 {
            self.row -= 1;
        } else if self.origin > 0 {
            self.origin -= 1;
        } else {
            let visible = self.visible(len);
            self.origin = len - visible;
            self.row = visible - 1;
        }
    }

    /// Apply a new viewport height and pull the cursor back inside the list.
    pub fn set_viewport_height(&mut self, height: usize, len: usize) {
        self.viewport_height = height.max(1);
        self.clamp(len);
    }

    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.reset();
            return;
        }
        let idx = (self.origin + self.row).min(len - 1);
        let visible = self.visible(len);
        self.row = self.row.min(visible - 1).min(idx);
        self.origin = idx - self.row;
        if self.origin + visible > len {
            self.origin = len - visible;
            self.row = idx - self.origin;
        }
    }
}

/// A titled, ordered list of items with a cursor.
///
/// `render` sorts the items, recomputes labels and resets the cursor to the top.
pub struct ListPane<T> {
    title: String,
    items: Vec<T>,
    labels: Vec<String>,
    cursor: ListCursor,
    label_of: fn(&T) -> String,
    order: fn(&T, &T) -> Ordering,
}

impl<T> ListPane<T> {
    pub fn new(title: impl Into<String>, label_of: fn(&T) -> String, order: fn(&T, &T) -> Ordering) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
            labels: Vec::new(),
            cursor: ListCursor::default(),
            label_of,
            order,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn render(&mut self, mut items: Vec<T>) {
        items.sort_by(self.order);
        self.labels = items.iter().map(self.label_of).collect();
        self.items = items;
        self.cursor.reset();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.labels.clear();
        self.cursor.reset();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> &ListCursor {
        &self.cursor
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.cursor.current_index(self.items.len())
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected_index().map(|i| &self.items[i])
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.selected_index().map(|i| self.labels[i].as_str())
    }

    pub fn move_down(&mut self) {
        self.cursor.move_down(self.items.len());
    }

    pub fn move_up(&mut self) {
        self.cursor.move_up(self.items.len());
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.cursor.set_viewport_height(height, self.items.len());
    }

    /// Labels currently inside the viewport, with the index of the highlighted one.
    pub fn visible_labels(&self) -> (&[String], Option<usize>) {
        let start = self.cursor.origin().min(self.labels.len());
        let end = (start + self.cursor.viewport_height()).min(self.labels.len());
        let highlight = (!self.is_empty()).then_some(self.cursor.row());
        (&self.labels[start..end], highlight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pane(items: &[&str], height: usize) -> ListPane<String> {
        let mut p = ListPane::new("Items", |s: &String| s.to_uppercase(), |a: &String, b: &String| a.cmp(b));
        p.render(items.iter().map(ToString::to_string).collect());
        p.set_viewport_height(height);
        p
    }

    #[test]
    fn scrolls_then_wraps() {
        let mut c = ListCursor::new(3);
        for _ in 0..4 {
            c.move_down(5);
        }
        assert_eq!((c.origin(), c.row()), (2, 2));
        assert_eq!(c.current_index(5), Some(4));
        c.move_down(5);
        assert_eq!((c.origin(), c.row()), (0, 0));
    }

    #[test]
    fn up_from_top_wraps_to_last() {
        let mut c = ListCursor::new(3);
        c.move_up(5);
        assert_eq!((c.origin(), c.row()), (2, 2));
        assert_eq!(c.current_index(5), Some(4));
    }

    #[test]
    fn up_scrolls_before_wrapping() {
        let mut c = ListCursor::new(3);
        c.move_up(5);
        c.move_up(5);
        c.move_up(5);
        assert_eq!((c.origin(), c.row()), (2, 0));
        c.move_up(5);
        assert_eq!((c.origin(), c.row()), (1, 0));
    }

    #[test]
    fn short_list_wraps_without_scrolling() {
        let mut c = ListCursor::new(10);
        c.move_down(2);
        assert_eq!(c.current_index(2), Some(1));
        c.move_down(2);
        assert_eq!(c.current_index(2), Some(0));
        c.move_up(2);
        assert_eq!((c.origin(), c.row()), (0, 1));
    }

    #[test]
    fn empty_list_is_a_noop() {
        let mut c = ListCursor::new(3);
        c.move_down(0);
        c.move_up(0);
        assert_eq!(c, ListCursor::new(3));
        assert_eq!(c.current_index(0), None);
    }

    #[test]
    fn full_cycle_returns_to_start_for_any_height() {
        for height in 1..8 {
            for len in 1..12 {
                let mut c = ListCursor::new(height);
                for step in 0..len {
                    assert_eq!(c.current_index(len), Some(step));
                    c.move_down(len);
                }
                assert_eq!((c.origin(), c.row()), (0, 0), "height {height} len {len}");
                for _ in 0..len {
                    c.move_up(len);
                }
                assert_eq!((c.origin(), c.row()), (0, 0), "height {height} len {len}");
            }
        }
    }

    #[test]
    fn shrinking_viewport_keeps_selection() {
        let mut c = ListCursor::new(6);
        for _ in 0..5 {
            c.move_down(8);
        }
        assert_eq!(c.current_index(8), Some(5));
        c.set_viewport_height(2, 8);
        assert_eq!(c.current_index(8), Some(5));
        assert!(c.row() < 2);
    }

    #[test]
    fn growing_viewport_pulls_origin_back() {
        let mut c = ListCursor::new(2);
        for _ in 0..4 {
            c.move_down(5);
        }
        c.set_viewport_height(10, 5);
        assert_eq!((c.origin(), c.row()), (0, 4));
    }

    #[test]
    fn clamp_after_list_shrinks() {
        let mut c = ListCursor::new(3);
        for _ in 0..6 {
            c.move_down(9);
        }
        c.clamp(2);
        assert_eq!(c.current_index(2), Some(1));
    }

    #[test]
    fn render_sorts_labels_and_resets() {
        let mut p = pane(&["b", "c", "a"], 5);
        p.move_down();
        assert_eq!(p.selected_label(), Some("B"));
        p.render(vec!["z".into(), "y".into()]);
        assert_eq!(p.labels(), &["Y".to_string(), "Z".to_string()]);
        assert_eq!(p.selected().map(String::as_str), Some("y"));
    }

    #[test]
    fn visible_labels_follow_origin() {
        let mut p = pane(&["a", "b", "c", "d", "e"], 2);
        p.move_down();
        p.move_down();
        let (labels, highlight) = p.visible_labels();
        assert_eq!(labels, &["B".to_string(), "C".to_string()]);
        assert_eq!(highlight, Some(1));
    }

    #[test]
    fn cleared_pane_has_no_selection() {
        let mut p = pane(&["a"], 2);
        p.clear();
        assert!(p.is_empty());
        assert_eq!(p.selected(), None);
        assert_eq!(p.visible_labels().1, None);
    }
}
