//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

use crate::host::DialogIcon;

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── popups ─────────────────────────────────────────────────
    pub fn popup_title_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn popup_border_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn text_style() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn selected_style() -> Style {
        Style::default()
            .fg(Color::White)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn hint_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn input_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn gauge_style() -> Style {
        Style::default().fg(Color::Green).bg(Color::Black)
    }

    pub fn icon_style(icon: DialogIcon) -> Style {
        let color = match icon {
            DialogIcon::Note => Color::Cyan,
            DialogIcon::Stop => Color::Red,
            DialogIcon::Caution => Color::Yellow,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}
