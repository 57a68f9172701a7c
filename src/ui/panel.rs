//! Bordered text panels for the console.
//!
//! Layout is computed on plain text (display width via `unicode-width`,
//! wrapping via `textwrap`); color is applied afterwards so ANSI escapes never
//! disturb the geometry.

use crossterm::style::{Color, Stylize, style};
use unicode_width::UnicodeWidthStr;

/// Narrowest content area, even on tiny terminals.
const MIN_INNER_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Normal command display
    Normal,
    /// Sensitive command display
    Danger,
    Success,
}

impl Tone {
    pub fn color(self) -> Color {
        match self {
            Tone::Normal => Color::Blue,
            Tone::Danger => Color::Red,
            Tone::Success => Color::Green,
        }
    }
}

/// Plain-text panel geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLayout {
    /// Width of the content area between `│ ` and ` │`.
    pub inner: usize,
    pub lines: Vec<String>,
}

/// Wrap `body` to fit a panel at most `max_width` columns wide.
pub fn layout_panel(title: &str, body: &str, max_width: usize) -> PanelLayout {
    let max_inner = max_width.saturating_sub(4).max(MIN_INNER_WIDTH);

    let lines: Vec<String> = body
        .lines()
        .flat_map(|line| {
            if line.trim().is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, max_inner)
                    .into_iter()
                    .map(|l| l.into_owned())
                    .collect()
            }
        })
        .collect();

    let content_width = lines.iter().map(|l| l.width()).max().unwrap_or(0);
    let inner = content_width.max(title.width() + 2);

    PanelLayout { inner, lines }
}

/// Render a titled, colored panel with rounded borders.
pub fn render_panel(title: &str, body: &str, tone: Tone, max_width: usize) -> String {
    let layout = layout_panel(title, body, max_width);
    let color = tone.color();
    let inner = layout.inner;

    let mut out = String::new();
    out.push_str(&format!(
        "{}{}{}\n",
        style("╭─ ").with(color),
        style(title).with(color).bold(),
        style(format!(" {}╮", "─".repeat(inner - title.width()))).with(color),
    ));
    for line in &layout.lines {
        let pad = inner.saturating_sub(line.width());
        out.push_str(&format!(
            "{} {}{} {}\n",
            style("│").with(color),
            line,
            " ".repeat(pad),
            style("│").with(color),
        ));
    }
    out.push_str(&format!(
        "{}",
        style(format!("╰{}╯", "─".repeat(inner + 2))).with(color)
    ));
    out
}

/// Current terminal width, or 80 when it cannot be determined.
pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(80)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_keeps_short_lines() {
        let layout = layout_panel("Command Execution", "Command to execute:\n\nls -la", 80);
        assert_eq!(layout.lines, vec!["Command to execute:", "", "ls -la"]);
        assert_eq!(layout.inner, "Command Execution".len() + 2);
    }

    #[test]
    fn test_layout_wraps_long_lines() {
        let body = "word ".repeat(40);
        let layout = layout_panel("T", &body, 40);
        assert!(layout.lines.len() > 1);
        assert!(layout.lines.iter().all(|l| l.width() <= 36));
    }

    #[test]
    fn test_layout_respects_minimum_width() {
        let layout = layout_panel("T", "a b c d e f g h i j k l m n o p q r s t u v w x y z", 5);
        assert!(layout.lines.iter().all(|l| l.width() <= MIN_INNER_WIDTH));
    }

    #[test]
    fn test_render_contains_title_and_body() {
        let rendered = render_panel("Sensitive Command", "Command: rm -rf build", Tone::Danger, 80);
        assert!(rendered.contains("Sensitive Command"));
        assert!(rendered.contains("Command: rm -rf build"));
        assert!(rendered.contains('╭'));
        assert!(rendered.contains('╯'));
        // Top border, one body line, bottom border.
        assert_eq!(rendered.lines().count(), 3);
    }

    #[test]
    fn test_tones_have_distinct_colors() {
        assert_ne!(Tone::Normal.color(), Tone::Danger.color());
        assert_eq!(Tone::Danger.color(), Color::Red);
    }
}
