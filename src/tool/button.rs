//! Toolbar button and its active/inactive affordance

use crate::dom::Dom;
use crate::error::DomResult;
use crate::models::metadata::TITLE;
use crate::models::SelectionState;

pub const BUTTON_CLASS: &str = "ce-inline-tool";
pub const BUTTON_MODIFIER_CLASS: &str = "ce-inline-tool--font-size";
pub const ACTIVE_CLASS: &str = "ce-inline-tool--active";

pub const ICON: &str = r##"<svg width="24" height="20" viewBox="0 0 24 20" fill="none" xmlns="http://www.w3.org/2000/svg"><path d="M12.5 18a.5.5 0 0 1-.5.5H6a.5.5 0 0 1 0-1h2.5v-15h-6V4a.5.5 0 0 1-1 0V2a.5.5 0 0 1 .5-.5h14a.5.5 0 0 1 .5.5v2a.5.5 0 0 1-1 0V2.5h-6v15H12a.5.5 0 0 1 .5.5ZM22 9.5h-8a.5.5 0 0 0-.5.5v1a.5.5 0 0 0 1 0v-.5h3v7H16a.5.5 0 0 0 0 1h4a.5.5 0 0 0 0-1h-1.5v-7h3v.5a.5.5 0 0 0 1 0v-1a.5.5 0 0 0-.5-.5Z" fill="currentColor"/></svg>"##;

/// Tooltip for the current state
pub fn title_for(state: &SelectionState) -> String {
    match state.display_size() {
        Some(size) => format!("{}: {}", TITLE, size),
        None => TITLE.to_string(),
    }
}

pub fn render<D: Dom>(dom: &mut D) -> DomResult<D::Node> {
    let button = dom.create_element("button")?;
    dom.set_attribute(&button, "type", "button")?;
    dom.set_inner_html(&button, ICON)?;
    dom.add_class(&button, BUTTON_CLASS)?;
    dom.add_class(&button, BUTTON_MODIFIER_CLASS)?;
    dom.set_attribute(&button, "title", TITLE)?;
    Ok(button)
}

/// Sync the active class and tooltip with `state`; safe to call repeatedly
pub fn refresh<D: Dom>(dom: &mut D, button: &D::Node, state: &SelectionState) -> DomResult<()> {
    if state.display_size().is_some() {
        dom.add_class(button, ACTIVE_CLASS)?;
    } else {
        dom.remove_class(button, ACTIVE_CLASS)?;
    }
    dom.set_attribute(button, "title", &title_for(state))
}
