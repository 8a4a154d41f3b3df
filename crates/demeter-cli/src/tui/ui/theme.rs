//! Color palettes for the dashboard.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

/// Colors used across the dashboard.
#[derive(Debug, Clone, Copy)]
pub struct AppTheme {
    pub accent: Color,

    pub good: Color,
    pub caution: Color,
    pub alert: Color,
    pub cool: Color,

    pub text: Color,
    pub text_dim: Color,
    pub text_muted: Color,

    pub border: Color,
    pub border_focus: Color,

    pub bg: Color,
    pub bg_header: Color,
}

impl Default for AppTheme {
    fn default() -> Self {
        Self::dark()
    }
}

impl AppTheme {
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            accent: Color::Rgb(52, 211, 153), // emerald-400

            good: Color::Rgb(74, 222, 128),
            caution: Color::Rgb(250, 204, 21),
            alert: Color::Rgb(248, 113, 113),
            cool: Color::Rgb(96, 165, 250),

            text: Color::Rgb(236, 253, 245),
            text_dim: Color::Rgb(163, 177, 170),
            text_muted: Color::Rgb(107, 122, 114),

            border: Color::Rgb(63, 82, 72),
            border_focus: Color::Rgb(52, 211, 153),

            bg: Color::Reset,
            bg_header: Color::Rgb(20, 38, 30),
        }
    }

    #[must_use]
    pub const fn light() -> Self {
        Self {
            accent: Color::Rgb(5, 150, 105), // emerald-600

            good: Color::Rgb(22, 163, 74),
            caution: Color::Rgb(202, 138, 4),
            alert: Color::Rgb(220, 38, 38),
            cool: Color::Rgb(37, 99, 235),

            text: Color::Rgb(17, 24, 20),
            text_dim: Color::Rgb(75, 90, 82),
            text_muted: Color::Rgb(140, 155, 147),

            border: Color::Rgb(200, 214, 206),
            border_focus: Color::Rgb(5, 150, 105),

            bg: Color::White,
            bg_header: Color::Rgb(236, 246, 240),
        }
    }

    #[inline]
    #[must_use]
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    #[inline]
    #[must_use]
    pub fn border_focus_style(&self) -> Style {
        Style::default().fg(self.border_focus)
    }

    #[inline]
    #[must_use]
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    #[inline]
    #[must_use]
    pub fn header_style(&self) -> Style {
        Style::default().bg(self.bg_header)
    }

    #[inline]
    #[must_use]
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.text_muted)
    }
}

/// Border type for all blocks.
pub const BORDER_TYPE: BorderType = BorderType::Rounded;
