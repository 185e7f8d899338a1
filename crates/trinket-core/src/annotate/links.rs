//! Cross-reference link annotation
//!
//! Terms are matched longest first. A match is only accepted if none of its
//! bytes were claimed by an earlier accepted match, so `Armor and Resistance`
//! wins over `Armor` inside the same phrase.

use super::wrap::RE_ENTITY;
use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Terms already linked within one description (or a caller-chosen group)
pub type LinkedTerms = HashSet<String>;

/// A dictionary entry: the term to find and the page it links to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTerm {
    pub term: String,
    pub target: String,
}

#[derive(Debug, Clone)]
struct CompiledTerm {
    link: LinkTerm,
    pattern: Regex,
    length: usize,
}

/// An ordered term → target dictionary
#[derive(Debug, Clone, Default)]
pub struct LinkDictionary {
    terms: Vec<CompiledTerm>,
}

impl LinkDictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from entries, keeping their order
    pub fn from_terms<I: IntoIterator<Item = LinkTerm>>(terms: I) -> std::result::Result<Self, regex::Error> {
        let mut dictionary = Self::new();
        for LinkTerm { term, target } in terms {
            dictionary.insert(term, target)?;
        }
        Ok(dictionary)
    }

    /// Load a dictionary from a JSON array of `{"term": ..., "target": ...}`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let terms: Vec<LinkTerm> = serde_json::from_str(&content)?;
        Ok(Self::from_terms(terms)?)
    }

    /// Add a term; re-adding a term updates its target in place
    pub fn insert(
        &mut self,
        term: impl Into<String>,
        target: impl Into<String>,
    ) -> std::result::Result<(), regex::Error> {
        let term = term.into();
        let target = target.into();
        if term.trim().is_empty() {
            return Ok(());
        }

        if let Some(existing) = self.terms.iter_mut().find(|t| t.link.term == term) {
            existing.link.target = target;
            return Ok(());
        }

        let pattern = Regex::new(&word_pattern(&term))?;
        self.terms.push(CompiledTerm {
            length: term.chars().count(),
            link: LinkTerm { term, target },
            pattern,
        });
        Ok(())
    }

    /// Number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Check if the dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Entries in insertion order
    pub fn terms(&self) -> impl Iterator<Item = &LinkTerm> {
        self.terms.iter().map(|t| &t.link)
    }

    /// Terms by descending length; ties keep insertion order
    fn longest_first(&self) -> Vec<&CompiledTerm> {
        let mut sorted: Vec<&CompiledTerm> = self.terms.iter().collect();
        sorted.sort_by(|a, b| b.length.cmp(&a.length));
        sorted
    }
}

/// Whole-word pattern for a term
///
/// Word boundaries are only required on edges that are word characters, so
/// terms like `+5` still match.
fn word_pattern(term: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut pattern = String::new();
    if term.chars().next().is_some_and(is_word) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(term));
    if term.chars().last().is_some_and(is_word) {
        pattern.push_str(r"\b");
    }
    pattern
}

/// Wiki link markup for matched text
pub fn link_markup(text: &str, target: &str) -> String {
    if text == target {
        format!("[[{}]]", text)
    } else {
        format!("[[{}|{}]]", target, text)
    }
}

/// Wrap every non-overlapping dictionary term occurrence in a link
///
/// Terms already in `linked` are skipped; every term linked here is added to
/// it. HTML entities already in the text are never matched into.
pub fn annotate_links(text: &str, dictionary: &LinkDictionary, linked: &mut LinkedTerms) -> String {
    let mut claimed = vec![false; text.len()];
    for entity in RE_ENTITY.find_iter(text) {
        claimed[entity.start()..entity.end()].fill(true);
    }
    let mut accepted: Vec<(usize, usize, &LinkTerm)> = Vec::new();

    for compiled in dictionary.longest_first() {
        if linked.contains(&compiled.link.term) {
            continue;
        }

        let mut found = false;
        for m in compiled.pattern.find_iter(text) {
            let span = &mut claimed[m.start()..m.end()];
            if span.iter().any(|&c| c) {
                continue;
            }
            span.fill(true);
            accepted.push((m.start(), m.end(), &compiled.link));
            found = true;
        }

        if found {
            linked.insert(compiled.link.term.clone());
        }
    }

    // Rightmost first so earlier offsets stay valid
    accepted.sort_by(|a, b| b.0.cmp(&a.0));

    let mut annotated = text.to_string();
    for (start, end, link) in accepted {
        annotated.replace_range(start..end, &link_markup(&text[start..end], &link.target));
    }
    annotated
}
