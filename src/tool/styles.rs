//! Stylesheet for the dropdown and the applied spans
//!
//! Injected once per document and keyed by [`STYLE_ID`]; every tool
//! instance shares it, so disposal leaves it in place.

use crate::dom::Dom;
use crate::error::{DomError, DomResult};

pub const STYLE_ID: &str = "font-size-tool-styles";

pub const STYLESHEET: &str = r#"
.font-size-dropdown {
  position: absolute;
  background: white;
  border: 1px solid #e0e0e0;
  border-radius: 8px;
  box-shadow: 0 4px 20px rgba(0, 0, 0, 0.1);
  z-index: 10000;
  min-width: 140px;
  padding: 8px 0;
}

.font-size-option {
  padding: 10px 16px;
  cursor: pointer;
  transition: background-color 0.2s ease;
  border-bottom: 1px solid #f5f5f5;
}

.font-size-option:last-child {
  border-bottom: none;
}

.font-size-option:hover {
  background-color: #f8f9fa;
}

.font-size-option--active {
  background-color: #e3f2fd;
  font-weight: bold;
}

.font-size-option--clear {
  font-style: italic;
}

.ce-inline-tool--font-size {
  position: relative;
}

.font-size-tool {
  font-family: inherit;
}
"#;

/// Add the stylesheet to the document head unless it is already there.
/// Returns whether this call inserted it.
pub fn inject<D: Dom>(dom: &mut D) -> DomResult<bool> {
    if dom.element_by_id(STYLE_ID).is_some() {
        return Ok(false);
    }
    let head = dom.head().ok_or(DomError::Detached)?;
    let style = dom.create_element("style")?;
    dom.set_attribute(&style, "id", STYLE_ID)?;
    dom.set_inner_html(&style, STYLESHEET)?;
    dom.append_child(&head, &style)?;
    log::debug!("font size stylesheet injected");
    Ok(true)
}
