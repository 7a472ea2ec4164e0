use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::session::view::{Scheme, ViewModel};
use crate::ui::layout::CardLayout;
use crate::ui::theme::Theme;

/// Full-screen card for one view model.
pub struct FlashCard<'a> {
    view: &'a ViewModel,
    theme: &'a Theme,
}

impl<'a> FlashCard<'a> {
    pub fn new(view: &'a ViewModel, theme: &'a Theme) -> Self {
        Self { view, theme }
    }
}

impl Widget for FlashCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (bg, fg) = self.theme.colors.pair(self.view.scheme);
        let base = Style::default().bg(bg).fg(fg);
        buf.set_style(area, base);

        if area.width == 0 || area.height == 0 {
            return;
        }

        let layout = CardLayout::new(area);

        Paragraph::new(Line::from(self.view.quit_hint))
            .style(base)
            .alignment(Alignment::Left)
            .render(layout.top, buf);
        Paragraph::new(Line::from(self.view.score_text.as_str()))
            .style(base)
            .alignment(Alignment::Right)
            .render(layout.top, buf);

        Paragraph::new(Line::from(Span::styled(
            self.view.main_text.as_str(),
            base.add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout.word, buf);

        if let Some(ref caption) = self.view.caption {
            Paragraph::new(Line::from(caption.as_str()))
                .style(base)
                .alignment(Alignment::Center)
                .render(layout.caption, buf);
        }

        // Hints stack upward from the bottom-right corner; progress sits
        // bottom-left on the last row.
        let hints: Vec<Line> = self
            .view
            .answer_hints
            .iter()
            .rev()
            .take(layout.footer.height as usize)
            .rev()
            .map(|hint| Line::from(*hint))
            .collect();
        Paragraph::new(hints)
            .style(base)
            .alignment(Alignment::Right)
            .render(layout.footer, buf);

        if layout.footer.height > 0 {
            let last_row = Rect::new(
                layout.footer.x,
                layout.footer.y + layout.footer.height - 1,
                layout.footer.width,
                1,
            );
            let progress_width = (self.view.progress_text.chars().count() as u16).min(last_row.width);
            // Accent only reads well against the neutral background
            let progress_style = if self.view.scheme == Scheme::Neutral {
                base.fg(self.theme.colors.accent())
            } else {
                base
            };
            Paragraph::new(Line::from(self.view.progress_text.as_str()))
                .style(progress_style)
                .render(Rect { width: progress_width, ..last_row }, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::view::answer_time_caption;
    use crate::ui::theme::ThemeColors;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    fn render(view: &ViewModel) -> Buffer {
        let theme = Theme {
            name: "test".to_string(),
            colors: ThemeColors::default(),
        };
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        FlashCard::new(view, &theme).render(area, &mut buf);
        buf
    }

    #[test]
    fn test_renders_every_view_field() {
        let view = ViewModel::new(
            Scheme::Correct,
            "because",
            Some(answer_time_caption(640)),
            4,
            5,
            6,
            30,
        );
        let buf = render(&view);

        let top = row_text(&buf, 0);
        assert!(top.starts_with("Esc: Quit"));
        assert!(top.trim_end().ends_with("Score: 4 (80%)"));
        assert!(row_text(&buf, 10).contains("because"));
        assert!(row_text(&buf, 15).contains("Answer time: 640 ms"));
        assert!(row_text(&buf, 17).trim_end().ends_with("Up: Correct"));
        assert!(row_text(&buf, 18).trim_end().ends_with("Down: Incorrect"));
        let last = row_text(&buf, 19);
        assert!(last.starts_with("Word: 6 of 30"));
        assert!(last.trim_end().ends_with("Right: Skip word"));
    }

    #[test]
    fn test_background_follows_scheme() {
        let view = ViewModel::new(Scheme::Incorrect, "the", None, 0, 1, 1, 3);
        let buf = render(&view);
        let (bg, _) = ThemeColors::default().pair(Scheme::Incorrect);
        assert_eq!(buf[(30, 5)].bg, bg);
    }

    #[test]
    fn test_progress_uses_accent_on_neutral_screen() {
        let view = ViewModel::new(Scheme::Neutral, "the", None, 0, 0, 1, 3);
        let buf = render(&view);
        assert_eq!(buf[(0, 19)].fg, ThemeColors::default().accent());
    }
}
