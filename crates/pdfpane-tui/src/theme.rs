use ratatui::style::{Color, Style};

use pdfpane_core::SessionStatus;

/// Color theme for the TUI.
pub struct Theme {
    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub active: Color,
    pub spinner: Color,
    pub success: Color,
    pub error: Color,
    pub footer_fg: Color,
}

impl Theme {
    /// Hacker-green terminal theme.
    pub fn hacker() -> Self {
        Self {
            header_fg: Color::Black,
            header_bg: Color::Rgb(0, 210, 0),
            border: Color::DarkGray,
            text: Color::White,
            dim: Color::DarkGray,
            highlight_bg: Color::Rgb(30, 50, 30),
            active: Color::Cyan,
            spinner: Color::Cyan,
            success: Color::Rgb(0, 210, 0),
            error: Color::Red,
            footer_fg: Color::DarkGray,
        }
    }

    /// Modern theme: white text, electric blue accents.
    pub fn modern() -> Self {
        Self {
            header_fg: Color::White,
            header_bg: Color::Rgb(30, 60, 120),
            border: Color::Rgb(60, 60, 80),
            text: Color::White,
            dim: Color::Rgb(120, 120, 140),
            highlight_bg: Color::Rgb(30, 40, 80),
            active: Color::Rgb(60, 140, 255),
            spinner: Color::Rgb(60, 140, 255),
            success: Color::Rgb(0, 200, 80),
            error: Color::Rgb(255, 80, 80),
            footer_fg: Color::Rgb(120, 120, 140),
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default().fg(self.header_fg).bg(self.header_bg)
    }

    pub fn status_color(&self, status: SessionStatus) -> Color {
        match status {
            SessionStatus::Idle => self.dim,
            SessionStatus::Previewing | SessionStatus::Processing => self.active,
            SessionStatus::Ready => self.success,
            SessionStatus::Failed => self.error,
        }
    }
}
