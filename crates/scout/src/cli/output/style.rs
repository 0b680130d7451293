//! Terminal styling: highlighted TOML and ANSI text styles.

use syntect::{
    easy::HighlightLines,
    highlighting::Style,
    parsing::SyntaxSet,
    util::{LinesWithEndings, as_24_bit_terminal_escaped},
};
use two_face::{
    syntax::extra_newlines as extra_syntaxes,
    theme::{EmbeddedLazyThemeSet, EmbeddedThemeName, extra as extra_themes},
};

/// Bold text.
const BOLD: &str = "\x1b[1m";
/// Cyan text.
const CYAN: &str = "\x1b[36m";
/// Green text.
const GREEN: &str = "\x1b[32m";
/// Yellow text.
const YELLOW: &str = "\x1b[33m";
/// Dim text.
const DIM: &str = "\x1b[2m";
/// Reset all formatting.
const RESET: &str = "\x1b[0m";

/// Highlights configuration files for the terminal.
pub struct Highlighter {
    /// Language definitions, including TOML.
    syntax_set: SyntaxSet,
    /// Embedded color themes.
    theme_set: EmbeddedLazyThemeSet,
    /// Theme in use.
    theme: EmbeddedThemeName,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Creates a highlighter with the Dracula theme.
    pub fn new() -> Self {
        Self {
            syntax_set: extra_syntaxes(),
            theme_set: extra_themes(),
            theme: EmbeddedThemeName::Dracula,
        }
    }

    /// Highlights TOML; unknown constructs pass through unstyled.
    pub fn highlight_toml(&self, content: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_extension("toml")
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let mut lines = HighlightLines::new(syntax, self.theme_set.get(self.theme));

        let mut output = String::with_capacity(content.len() * 2);
        for line in LinesWithEndings::from(content) {
            let ranges: Vec<(Style, &str)> = lines
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_else(|_| vec![(Style::default(), line)]);
            output.push_str(&as_24_bit_terminal_escaped(&ranges, false));
        }
        output.push_str(RESET);
        output
    }
}

/// Bold cyan section header.
pub fn header(text: &str) -> String {
    format!("{BOLD}{CYAN}{text}{RESET}")
}

/// Bold subheader.
pub fn subheader(text: &str) -> String {
    format!("{BOLD}{text}{RESET}")
}

/// Dimmed, less important text.
pub fn dim(text: &str) -> String {
    format!("{DIM}{text}{RESET}")
}

/// Green success text.
pub fn success(text: &str) -> String {
    format!("{GREEN}{text}{RESET}")
}

/// Yellow warning text.
pub fn warning(text: &str) -> String {
    format!("{YELLOW}{text}{RESET}")
}

/// Indents every non-empty line by two spaces.
pub fn indent(content: &str) -> String {
    content
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("  {line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
