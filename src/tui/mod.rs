pub mod confirm_overlay;
pub mod feedback_overlay;
pub mod filter_bar;
pub mod footer;
pub mod header;
pub mod keymap_overlay;
pub mod launch_overlay;
pub mod layout;
pub mod list_pane;
pub mod render;
pub mod run_info;

use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const BRAILLE_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn spinner(idx: usize) -> char {
    BRAILLE_FRAMES[idx % BRAILLE_FRAMES.len()]
}

/// A `width` x `height` rectangle centred in `area`, clipped to it.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Cut `s` to at most `max` display columns, marking the cut with `…`.
pub fn truncate(s: &str, max: usize) -> String {
    if UnicodeWidthStr::width(s) <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let cw = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + cw + 1 > max {
            break;
        }
        out.push(c);
        width += cw;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn spinner_frames_are_braille_and_wrap() {
        for &ch in BRAILLE_FRAMES {
            assert!(('\u{2800}'..='\u{28FF}').contains(&ch), "{ch:?}");
        }
        assert_eq!(spinner(0), spinner(BRAILLE_FRAMES.len()));
        let _ = spinner(usize::MAX);
    }

    #[test]
    fn centered_fits_inside() {
        let area = Rect::new(10, 5, 100, 40);
        assert_eq!(centered(area, 40, 10), Rect::new(40, 20, 40, 10));
        assert_eq!(centered(area, 500, 500), area);
    }

    #[test]
    fn truncate_short_and_long() {
        assert_eq!(truncate("daily", 10), "daily");
        assert_eq!(truncate("daily_etl_job", 6), "daily…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn truncate_wide_chars() {
        assert_eq!(truncate("日本語テキスト", 7), "日本語…");
    }
}
