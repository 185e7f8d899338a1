//! Inline color-code stripping
//!
//! A color token is: escape marker, one style letter, five hex digits, the
//! payload, and a closing escape marker. `^c00ff0Fire^` becomes `Fire`.

use regex::Regex;

/// Default escape marker for color tokens
pub const DEFAULT_COLOR_ESCAPE: char = '^';

/// Removes color tokens, keeping their payload
#[derive(Debug, Clone)]
pub struct ColorCodeStripper {
    pattern: Regex,
}

impl ColorCodeStripper {
    /// Create a stripper for the given escape marker
    pub fn new(escape: char) -> Result<Self, regex::Error> {
        let marker = regex::escape(&escape.to_string());
        let pattern = format!(
            "{m}[A-Za-z][0-9A-Fa-f]{{5}}([^{m}]*){m}",
            m = marker
        );
        Ok(Self {
            pattern: Regex::new(&pattern)?,
        })
    }

    /// Replace every color token with its payload
    pub fn strip(&self, text: &str) -> String {
        self.pattern.replace_all(text, "$1").into_owned()
    }
}
