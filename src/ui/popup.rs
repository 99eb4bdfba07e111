//! Popup overlay widgets for the terminal host's prompts.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, StatefulWidget, Widget, Wrap},
};

use super::layout::centered_fixed;
use super::prompt::{DialogPrompt, FolderPrompt, ListPrompt};
use super::theme::Theme;
use crate::host::{Dialog, DialogIcon, Progress};

fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(Theme::popup_title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::popup_border_style())
}

/// Number of rows `text` occupies when wrapped to `width` columns.
fn wrapped_rows(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    text.lines()
        .map(|line| line.chars().count().max(1).div_ceil(width))
        .sum::<usize>()
        .max(1)
        .try_into()
        .unwrap_or(u16::MAX)
}

fn icon_glyph(icon: DialogIcon) -> &'static str {
    match icon {
        DialogIcon::Note => "ℹ ",
        DialogIcon::Stop => "✖ ",
        DialogIcon::Caution => "⚠ ",
    }
}

// ───────────────────────────────────────── dialog popup ──────

/// Modal dialog: message text, optional answer field, button row.
pub struct DialogPopup<'a> {
    pub dialog: &'a Dialog,
    pub prompt: &'a DialogPrompt,
}

impl<'a> Widget for DialogPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = 56.min(area.width);
        let text_rows = wrapped_rows(&self.dialog.text, width.saturating_sub(4));
        let answer_rows = if self.prompt.answer.is_some() { 2 } else { 0 };
        // border + blank + text + answer + blank + buttons + blank + hint + border
        let height = text_rows + answer_rows + 7;
        let popup = centered_fixed(width, height, area);
        Clear.render(popup, buf);

        let block = popup_block(self.dialog.title.as_deref().unwrap_or("Dialog"));
        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines = vec![Line::raw("")];
        for (i, text_line) in self.dialog.text.lines().enumerate() {
            let mut spans = Vec::new();
            if i == 0 {
                if let Some(icon) = self.dialog.icon {
                    spans.push(Span::styled(icon_glyph(icon), Theme::icon_style(icon)));
                }
            }
            spans.push(Span::styled(text_line.to_string(), Theme::text_style()));
            lines.push(Line::from(spans));
        }

        if let Some(field) = &self.prompt.answer {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                format!("> {}▏", field.value),
                Theme::input_style(),
            )));
        }

        lines.push(Line::raw(""));
        let mut buttons = Vec::new();
        for (i, label) in self.prompt.buttons.iter().enumerate() {
            let style = if i == self.prompt.selected {
                Theme::selected_style()
            } else {
                Theme::text_style()
            };
            buttons.push(Span::raw(" "));
            buttons.push(Span::styled(format!("[ {label} ]"), style));
        }
        lines.push(Line::from(buttons).right_aligned());

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  ←/→: choose  Enter: press  Esc: cancel",
            Theme::hint_style(),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

// ───────────────────────────────────────── list popup ────────

/// Single-choice list picker.
pub struct ListPopup<'a> {
    pub prompt_text: &'a str,
}

impl ListPopup<'_> {
    /// Rows available for items inside a popup placed in `area`.
    pub fn visible_rows(area: Rect, item_count: usize) -> usize {
        let height = Self::height(area, item_count);
        // border(2) + prompt + blank + blank + hint
        usize::from(height.saturating_sub(6))
    }

    fn height(area: Rect, item_count: usize) -> u16 {
        let wanted = u16::try_from(item_count.max(1)).unwrap_or(u16::MAX).saturating_add(6);
        wanted.min(area.height.saturating_sub(2)).max(7)
    }
}

impl StatefulWidget for ListPopup<'_> {
    type State = ListPrompt;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut ListPrompt) {
        let height = Self::height(area, state.items.len());
        let popup = centered_fixed(52, height, area);
        Clear.render(popup, buf);

        let block = popup_block("Choose");
        let inner = block.inner(popup);
        block.render(popup, buf);

        let rows = Self::visible_rows(area, state.items.len());
        state.clamp_scroll(rows);

        let mut lines = vec![Line::from(Span::styled(
            format!(" {}", self.prompt_text),
            Theme::text_style(),
        ))];
        lines.push(Line::raw(""));

        if state.items.is_empty() {
            lines.push(Line::from(Span::styled("   (no entries)", Theme::hint_style())));
        }
        for (i, item) in state.items.iter().enumerate().skip(state.offset).take(rows) {
            let (prefix, style) = if i == state.selected {
                (" ▸ ", Theme::selected_style())
            } else {
                ("   ", Theme::text_style())
            };
            lines.push(Line::from(Span::styled(format!("{prefix}{item}"), style)));
        }

        // Pad so the hint stays on the last row.
        while lines.len() < rows + 2 {
            lines.push(Line::raw(""));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  ↑/↓: move  Enter: choose  Esc: none",
            Theme::hint_style(),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── folder popup ──────

/// Folder path entry.
pub struct FolderPopup<'a> {
    pub prompt_text: &'a str,
    pub prompt: &'a FolderPrompt,
}

impl<'a> Widget for FolderPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_fixed(64, 9, area);
        Clear.render(popup, buf);

        let block = popup_block("Choose Folder");
        let inner = block.inner(popup);
        block.render(popup, buf);

        let error_line = match &self.prompt.error {
            Some(err) => Line::from(Span::styled(format!(" {err}"), Theme::icon_style(DialogIcon::Stop))),
            None => Line::raw(""),
        };

        let lines = vec![
            Line::from(Span::styled(format!(" {}", self.prompt_text), Theme::text_style())),
            Line::raw(""),
            Line::from(Span::styled(
                format!(" > {}▏", self.prompt.field.value),
                Theme::input_style(),
            )),
            error_line,
            Line::raw(""),
            Line::from(Span::styled(
                "  Enter: choose  Ctrl+U: clear  Esc: cancel",
                Theme::hint_style(),
            )),
        ];

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── progress popup ────

/// Progress bar with description lines.
pub struct ProgressPopup<'a> {
    pub progress: &'a Progress,
}

impl<'a> Widget for ProgressPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_fixed(56, 8, area);
        Clear.render(popup, buf);

        let block = popup_block("Progress");
        let inner = block.inner(popup);
        block.render(popup, buf);

        if inner.height < 4 {
            return;
        }

        let text = Rect::new(inner.x, inner.y, inner.width, 2);
        Paragraph::new(vec![
            Line::from(Span::styled(
                format!(" {}", self.progress.description),
                Theme::text_style(),
            )),
            Line::from(Span::styled(
                format!(" {}", self.progress.additional_description),
                Theme::hint_style(),
            )),
        ])
        .render(text, buf);

        let bar = Rect::new(inner.x + 1, inner.y + 3, inner.width.saturating_sub(2), 1);
        Gauge::default()
            .gauge_style(Theme::gauge_style())
            .ratio(self.progress.ratio())
            .label(format!("{}/{}", self.progress.completed, self.progress.total))
            .render(bar, buf);
    }
}
