//! Selection inspection
//!
//! Walks from the selection anchor up through its element ancestors and
//! reports the first font size found.

use std::iter::successors;

use crate::dom::Dom;
use crate::models::{SelectionState, FONT_SIZE_PROPERTY, MARKER_CLASS};

/// Font size in effect at `anchor`.
///
/// An inline `font-size` declaration wins and is reported as declared. A
/// marker-class element without one reports its computed size.
pub fn inspect<D: Dom>(dom: &D, anchor: Option<&D::Node>) -> SelectionState {
    let Some(anchor) = anchor else {
        return SelectionState::none();
    };

    let start = if dom.is_text(anchor) {
        dom.parent_element(anchor)
    } else if dom.is_element(anchor) {
        Some(anchor.clone())
    } else {
        None
    };

    for element in successors(start, |el| dom.parent_element(el)) {
        if let Some(size) = dom.style_property(&element, FONT_SIZE_PROPERTY) {
            return SelectionState::sized(size);
        }
        if dom.has_class(&element, MARKER_CLASS) {
            return SelectionState {
                has_size: true,
                current_size: dom.computed_font_size(&element),
            };
        }
    }

    SelectionState::none()
}
