//! Message styling for the reservation prompts and reports.
//!
//! Styling is dropped when stdout is not a color-capable terminal, so piped
//! output such as `history --format json` stays plain.

use owo_colors::{OwoColorize, colors::css};

fn color_enabled() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Success,
    Warning,
    Failure,
    Muted,
}

impl Tone {
    fn paint(self, text: &str) -> String {
        if !color_enabled() {
            return text.to_owned();
        }
        match self {
            Self::Success => text.fg::<css::SeaGreen>().to_string(),
            Self::Warning => text.fg::<css::GoldenRod>().to_string(),
            Self::Failure => text.fg::<css::IndianRed>().bold().to_string(),
            Self::Muted => text.dimmed().to_string(),
        }
    }
}

/// Styles a message by outcome.
pub trait Colorize {
    /// A completed reservation, cancellation or save.
    fn success(&self) -> String;
    /// Skipped records and failed saves.
    fn warning(&self) -> String;
    /// A rejected selection or an unknown teacher.
    fn failure(&self) -> String;
    /// Secondary text such as empty listings.
    fn dim(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        Tone::Success.paint(self.as_ref())
    }

    fn warning(&self) -> String {
        Tone::Warning.paint(self.as_ref())
    }

    fn failure(&self) -> String {
        Tone::Failure.paint(self.as_ref())
    }

    fn dim(&self) -> String {
        Tone::Muted.paint(self.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styled_text_keeps_the_message() {
        for styled in [
            "Reserved".success(),
            "Skipped".warning(),
            String::from("Not found").failure(),
            "None".dim(),
        ] {
            assert!(
                ["Reserved", "Skipped", "Not found", "None"]
                    .iter()
                    .any(|message| styled.contains(message))
            );
        }
    }
}
