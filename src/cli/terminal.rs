//! Coloured terminal output.

use owo_colors::{OwoColorize, Style, colors::css};

/// Whether stdout accepts ANSI colours.
pub fn supports_color() -> bool {
    supports_color::on_cached(supports_color::Stream::Stdout).is_some()
}

fn paint(text: &str, style: Style) -> String {
    if supports_color() {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Styles for the result lines printed by the commands.
pub trait Colorize {
    /// Green, for a completed command.
    fn success(&self) -> String;
    /// Amber, for a result that needs attention.
    fn warning(&self) -> String;
    /// Blue, for headings.
    fn info(&self) -> String;
    /// Dimmed, for secondary detail.
    fn dim(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        paint(self.as_ref(), Style::new().fg::<css::Green>())
    }

    fn warning(&self) -> String {
        paint(self.as_ref(), Style::new().fg::<css::Orange>())
    }

    fn info(&self) -> String {
        paint(self.as_ref(), Style::new().fg::<css::LightBlue>())
    }

    fn dim(&self) -> String {
        paint(self.as_ref(), Style::new().dimmed())
    }
}
