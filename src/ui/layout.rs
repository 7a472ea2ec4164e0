use ratatui::layout::Rect;

/// Row placement for the flash card: status line on top, the word at mid
/// height, its caption at three quarters, and the answer hints stacked in
/// the bottom rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardLayout {
    pub top: Rect,
    pub word: Rect,
    pub caption: Rect,
    pub footer: Rect,
}

pub const FOOTER_ROWS: u16 = 3;

impl CardLayout {
    pub fn new(area: Rect) -> Self {
        let row = |y: u16| Rect::new(area.x, y, area.width, area.height.min(1));
        let last = area.y + area.height.saturating_sub(1);

        let footer_rows = FOOTER_ROWS.min(area.height.saturating_sub(1));
        let footer = Rect::new(
            area.x,
            area.y + area.height - footer_rows,
            area.width,
            footer_rows,
        );

        let word_y = (area.y + area.height / 2).min(last);
        let caption_y = (area.y + area.height * 3 / 4)
            .max(word_y + 1)
            .min(footer.y.saturating_sub(1).max(area.y));

        Self {
            top: row(area.y),
            word: row(word_y),
            caption: row(caption_y),
            footer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_terminal() {
        let layout = CardLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.top, Rect::new(0, 0, 80, 1));
        assert_eq!(layout.word.y, 12);
        assert_eq!(layout.caption.y, 18);
        assert_eq!(layout.footer, Rect::new(0, 21, 80, 3));
    }

    #[test]
    fn test_tiny_area_stays_inside() {
        let area = Rect::new(2, 3, 10, 4);
        let layout = CardLayout::new(area);
        for rect in [layout.top, layout.word, layout.caption, layout.footer] {
            assert!(rect.y >= area.y);
            assert!(rect.y + rect.height <= area.y + area.height);
        }
    }
}
