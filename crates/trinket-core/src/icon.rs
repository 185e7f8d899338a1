//! Icon node recognition
//!
//! An icon node looks like
//! `<a name="icon"><s>sheet.png</s><i>0</i><vec4>x y w h</vec4></a>`.

use crate::record::{IconRef, Rect};
use crate::xml::Element;

/// Name attribute that marks an icon node
pub const ICON_FIELD: &str = "icon";

/// Check whether a node is the icon field
pub fn is_icon_node(element: &Element) -> bool {
    element.name_attr() == Some(ICON_FIELD)
}

/// Extract the spritesheet reference and rectangle from an icon node
///
/// Returns `None` when the node does not have the expected shape.
pub fn extract_icon(element: &Element) -> Option<IconRef> {
    if !is_icon_node(element) {
        return None;
    }

    let [sheet, index, vec4] = element.children.as_slice() else {
        return None;
    };

    if sheet.tag != "s" || index.tag != "i" || vec4.tag != "vec4" {
        return None;
    }

    let spritesheet = sheet.trimmed_text();
    let index = index.trimmed_text();
    if spritesheet.is_empty() || index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let rect: Rect = vec4.trimmed_text().parse().ok()?;

    Some(IconRef {
        spritesheet: spritesheet.to_string(),
        rect,
    })
}
