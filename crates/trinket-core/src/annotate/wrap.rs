//! Greedy word wrapping for table cells

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static RE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[(?:[^\]|]*\|)?([^\]]*)\]\]").unwrap());
pub(super) static RE_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#?[A-Za-z0-9]+;").unwrap());

/// Default maximum line width, in visible characters
pub const DEFAULT_WRAP_WIDTH: usize = 40;

/// Default marker placed between wrapped lines
pub const DEFAULT_LINE_BREAK: &str = "<br>";

/// Greedy fixed-width wrapper
///
/// Words starting with `+` (stat bonuses) always begin a new line unless they
/// are the first word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordWrapper {
    pub width: usize,
    pub line_break: String,
}

impl Default for WordWrapper {
    fn default() -> Self {
        Self::new(DEFAULT_WRAP_WIDTH, DEFAULT_LINE_BREAK)
    }
}

impl WordWrapper {
    /// Create a wrapper with the given width and line-break marker
    pub fn new(width: usize, line_break: impl Into<String>) -> Self {
        Self {
            width,
            line_break: line_break.into(),
        }
    }

    /// Split a single line into wrapped lines
    pub fn wrap_lines(&self, text: &str) -> Vec<String> {
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut current_width = 0;

        for (i, word) in words(text).into_iter().enumerate() {
            let label = visible_label(word);
            let width = visible_width(&label);
            let forced = i > 0 && label.starts_with('+');

            if !current.is_empty() && (forced || current_width + 1 + width > self.width) {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            if !current.is_empty() {
                current.push(' ');
                current_width += 1;
            }
            current.push_str(word);
            current_width += width;
        }

        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    /// Wrap a single line and join the pieces with the line-break marker
    pub fn wrap(&self, text: &str) -> String {
        self.wrap_lines(text).join(&self.line_break)
    }
}

/// Split on whitespace, keeping `[[link markup]]` in one piece
fn words(text: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start: Option<usize> = None;
    let mut depth = 0usize;
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i..].starts_with(b"[[") {
            depth += 1;
            start.get_or_insert(i);
            i += 2;
            continue;
        }
        if depth > 0 && bytes[i..].starts_with(b"]]") {
            depth -= 1;
            i += 2;
            continue;
        }

        let c = text[i..].chars().next().unwrap_or(' ');
        if c.is_whitespace() && depth == 0 {
            if let Some(s) = start.take() {
                words.push(&text[s..i]);
            }
        } else {
            start.get_or_insert(i);
        }
        i += c.len_utf8();
    }

    if let Some(s) = start {
        words.push(&text[s..]);
    }
    words
}

/// A word with link markup reduced to its label
fn visible_label(word: &str) -> Cow<'_, str> {
    RE_LINK.replace_all(word, "$1")
}

/// Width of a word as displayed: links count their label, entities count one
fn visible_width(word: &str) -> usize {
    let labels = visible_label(word);
    let entities = RE_ENTITY.replace_all(&labels, "_");
    entities.chars().count()
}
