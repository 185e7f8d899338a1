//! Description formatting for table cells
//!
//! Order matters: newlines are unescaped, color codes stripped, pipes
//! escaped, terms linked, then each line is wrapped.

use super::color::ColorCodeStripper;
use super::links::{annotate_links, LinkDictionary, LinkedTerms};
use super::wrap::WordWrapper;
use crate::compose::{split_description, unescape_newlines};

/// Pipe escape, so cell text cannot break table markup
pub const PIPE_ENTITY: &str = "&#124;";

/// Formats raw description text into annotated, wrapped cell markup
#[derive(Debug, Clone)]
pub struct DescriptionFormatter<'a> {
    dictionary: &'a LinkDictionary,
    stripper: ColorCodeStripper,
    wrapper: WordWrapper,
}

impl<'a> DescriptionFormatter<'a> {
    pub fn new(dictionary: &'a LinkDictionary, stripper: ColorCodeStripper, wrapper: WordWrapper) -> Self {
        Self {
            dictionary,
            stripper,
            wrapper,
        }
    }

    /// The line-break marker used between lines
    pub fn line_break(&self) -> &str {
        &self.wrapper.line_break
    }

    /// Format one piece of text, sharing `linked` with related calls
    pub fn format_text(&self, text: &str, linked: &mut LinkedTerms) -> String {
        let text = unescape_newlines(text);
        let text = self.stripper.strip(text.trim());
        let text = text.replace('|', PIPE_ENTITY);
        let text = annotate_links(&text, self.dictionary, linked);

        text.lines()
            .map(|line| self.wrapper.wrap(line))
            .collect::<Vec<_>>()
            .join(&self.wrapper.line_break)
    }

    /// Format a composite `Base:`/`Attuned:` description
    ///
    /// Each part is annotated on its own. A lone base part is shown without
    /// its label.
    pub fn format_description(&self, composite: &str) -> String {
        let parts = split_description(composite);
        let base = parts
            .base
            .map(|b| self.format_text(&b, &mut LinkedTerms::new()));
        let attuned = parts
            .attuned
            .map(|a| self.format_text(&a, &mut LinkedTerms::new()));

        let br = &self.wrapper.line_break;
        match (base, attuned) {
            (Some(base), Some(attuned)) => {
                format!("'''Base:''' {base}{br}{br}'''Attuned:''' {attuned}")
            }
            (Some(base), None) => base,
            (None, Some(attuned)) => format!("'''Attuned:''' {attuned}"),
            (None, None) => String::new(),
        }
    }

    /// Format a block of set effects; a term is linked once per block
    pub fn format_effects(&self, effects: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut linked = LinkedTerms::new();
        effects
            .iter()
            .map(|(threshold, description)| {
                (
                    threshold.to_string(),
                    self.format_text(description, &mut linked),
                )
            })
            .collect()
    }
}
