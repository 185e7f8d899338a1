//! Text annotation engine for item descriptions
//!
//! Each stage works on plain strings:
//! - [`color`] strips inline color-control tokens
//! - [`links`] wraps dictionary terms in cross-reference links
//! - [`wrap`] soft-wraps lines to a fixed width
//! - [`format`] runs the stages in a fixed order

pub mod color;
pub mod format;
pub mod links;
pub mod wrap;

pub use color::ColorCodeStripper;
pub use format::DescriptionFormatter;
pub use links::{annotate_links, LinkDictionary, LinkTerm, LinkedTerms};
pub use wrap::WordWrapper;
