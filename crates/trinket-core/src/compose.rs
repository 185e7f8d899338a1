//! Composite item descriptions
//!
//! A composite holds the base description and the attuned variant, each
//! behind a label: `Base: ...` and `Attuned: ...`, separated by a blank line.

pub const BASE_LABEL: &str = "Base:";
pub const ATTUNED_LABEL: &str = "Attuned:";

/// Turn escaped newline sequences (a backslash followed by `n`) into newlines
pub fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

/// Build the composite description from `desc` and `attune-desc`
///
/// Empty inputs count as absent; with neither present the result is empty.
pub fn compose_description(desc: Option<&str>, attune_desc: Option<&str>) -> String {
    let desc = desc.map(unescape_newlines).filter(|d| !d.trim().is_empty());
    let attune_desc = attune_desc
        .map(unescape_newlines)
        .filter(|d| !d.trim().is_empty());

    let mut composite = String::new();
    if let Some(base) = desc {
        composite.push_str(BASE_LABEL);
        composite.push(' ');
        composite.push_str(&base);
    }
    if let Some(attuned) = attune_desc {
        if !composite.is_empty() {
            composite.push_str("\n\n");
        }
        composite.push_str(ATTUNED_LABEL);
        composite.push(' ');
        composite.push_str(&attuned);
    }
    composite
}

/// The two parts of a composite description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionParts {
    pub base: Option<String>,
    pub attuned: Option<String>,
}

/// Split a composite description back into its base and attuned parts
///
/// Text without labels is treated as the base description.
pub fn split_description(composite: &str) -> DescriptionParts {
    let text = unescape_newlines(composite);

    let (base, attuned) = match text.find(ATTUNED_LABEL) {
        Some(pos) => (&text[..pos], Some(&text[pos + ATTUNED_LABEL.len()..])),
        None => (text.as_str(), None),
    };

    let base = base.trim();
    let base = base.strip_prefix(BASE_LABEL).unwrap_or(base);

    DescriptionParts {
        base: non_empty(base),
        attuned: attuned.and_then(non_empty),
    }
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
