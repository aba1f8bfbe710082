//! Text helpers for putting user-supplied strings on screen.
//!
//! Anything typed by a user (descriptions, comments, names, emails) passes
//! through a [`Sanitizer`] before it is rendered, so an embedded escape
//! sequence cannot repaint or hijack the terminal. The remaining helpers
//! shorten and pad text by grapheme cluster and display width, which keeps
//! table columns aligned with wide and combining characters.
//!
//! ```rust
//! use complaint_desk::text::{Sanitizer, preview};
//!
//! let clean = Sanitizer::single_line().sanitize("Broken\x1b[2J tap\nin block C");
//! assert_eq!(clean, "Broken tap in block C");
//! assert_eq!(preview("abcdef", 3), "abc...");
//! ```

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Removes escape sequences and control characters, replacing newlines and
/// tabs with configurable strings.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    replace_newline: String,
    replace_tab: String,
}

impl Default for Sanitizer {
    /// Keeps newlines, expands tabs to four spaces.
    fn default() -> Self {
        Self {
            replace_newline: "\n".to_string(),
            replace_tab: "    ".to_string(),
        }
    }
}

impl Sanitizer {
    /// A sanitizer for table cells and other one-line slots: newlines and
    /// tabs become single spaces.
    pub fn single_line() -> Self {
        Self {
            replace_newline: " ".to_string(),
            replace_tab: " ".to_string(),
        }
    }

    /// Sets the newline replacement.
    pub fn with_newline(mut self, repl: &str) -> Self {
        self.replace_newline = repl.to_string();
        self
    }

    /// Sets the tab replacement.
    pub fn with_tab(mut self, repl: &str) -> Self {
        self.replace_tab = repl.to_string();
        self
    }

    /// Cleans `input`. `\r\n` counts as a single newline.
    pub fn sanitize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut segment = String::new();
        let mut chars = input.chars().peekable();
        while let Some(ch) = chars.next() {
            let repl = match ch {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    &self.replace_newline
                }
                '\n' => &self.replace_newline,
                '\t' => &self.replace_tab,
                c => {
                    segment.push(c);
                    continue;
                }
            };
            push_printable(&mut out, &segment);
            segment.clear();
            out.push_str(repl);
        }
        push_printable(&mut out, &segment);
        out
    }
}

// Escape sequences go first, then any stray control character.
fn push_printable(out: &mut String, segment: &str) {
    if segment.is_empty() {
        return;
    }
    let stripped = strip_ansi_escapes::strip_str(segment);
    out.extend(stripped.chars().filter(|c| !c.is_control()));
}

/// Sanitizes for a one-line slot.
pub fn clean_line(input: &str) -> String {
    Sanitizer::single_line().sanitize(input)
}

/// Keeps the first `max` grapheme clusters of `s`, appending `...` when
/// anything was cut.
pub fn preview(s: &str, max: usize) -> String {
    let mut graphemes = s.graphemes(true);
    let head: String = graphemes.by_ref().take(max).collect();
    if graphemes.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Display width of `s` in terminal columns.
pub fn width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cuts `s` to at most `cols` display columns (ending in `…` when cut) and
/// pads it with spaces to exactly `cols`.
pub fn fit(s: &str, cols: usize) -> String {
    let w = width(s);
    if w <= cols {
        return format!("{s}{}", " ".repeat(cols - w));
    }
    if cols == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for g in s.graphemes(true) {
        let gw = width(g);
        if used + gw > cols - 1 {
            break;
        }
        out.push_str(g);
        used += gw;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(cols.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_escape_sequences_and_controls() {
        let s = Sanitizer::default();
        assert_eq!(s.sanitize("Text\x00\x07\x1b[2J\x7f"), "Text");
        assert_eq!(s.sanitize("a\tb\r\nc"), "a    b\nc");
    }

    #[test]
    fn single_line_flattens_whitespace() {
        assert_eq!(clean_line("one\ntwo\tthree"), "one two three");
        let custom = Sanitizer::default().with_newline(" | ").with_tab("");
        assert_eq!(custom.sanitize("a\nb\tc"), "a | bc");
    }

    #[test]
    fn preview_counts_graphemes() {
        assert_eq!(preview("short", 50), "short");
        let long = "x".repeat(51);
        assert_eq!(preview(&long, 50), format!("{}...", "x".repeat(50)));
        // "é" written as e + combining acute is one grapheme
        assert_eq!(preview("e\u{301}e\u{301}e\u{301}", 2), "e\u{301}e\u{301}...");
    }

    #[test]
    fn fit_pads_and_truncates_by_width() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(width(&fit("宿舍宿舍", 5)), 5);
        assert_eq!(fit("abc", 0), "");
    }
}
