//! Size menu
//!
//! `Closed -> Open -> Closed`. Opening subscribes to menu clicks and
//! document pointer-downs; every way out of `Open` goes through
//! [`SizeMenu::close`], which drops the subscription and the element.

use crate::dom::{Dom, Rect};
use crate::error::{DomError, DomResult};
use crate::models::{SelectionState, SizeChoice, ToolConfig, FONT_SIZE_PROPERTY};

pub const DROPDOWN_CLASS: &str = "font-size-dropdown";
pub const OPTION_CLASS: &str = "font-size-option";
pub const OPTION_ACTIVE_CLASS: &str = "font-size-option--active";
pub const OPTION_CLEAR_CLASS: &str = "font-size-option--clear";

pub const SIZE_ATTRIBUTE: &str = "data-size";
pub const CLEAR_ATTRIBUTE: &str = "data-clear";

pub const CLEAR_LABEL: &str = "Default";

/// Outside pointer-downs this soon after opening belong to the opening
/// gesture and are ignored
pub const MENU_GRACE_MS: f64 = 100.0;

/// Gap between the button and the dropdown
pub const MENU_OFFSET_PX: f64 = 8.0;

pub struct OpenMenu<D: Dom> {
    pub element: D::Node,
    /// Selection the menu was opened for
    pub range: D::Range,
    subscription: D::Subscription,
    opened_at: f64,
}

pub enum SizeMenu<D: Dom> {
    Closed,
    Open(OpenMenu<D>),
}

impl<D: Dom> Default for SizeMenu<D> {
    fn default() -> Self {
        SizeMenu::Closed
    }
}

impl<D: Dom> SizeMenu<D> {
    pub fn is_open(&self) -> bool {
        matches!(self, SizeMenu::Open(_))
    }

    pub fn element(&self) -> Option<&D::Node> {
        match self {
            SizeMenu::Open(open) => Some(&open.element),
            SizeMenu::Closed => None,
        }
    }

    /// Attach `element` to the body and start listening. Any menu still
    /// open is closed first.
    pub fn open(&mut self, dom: &mut D, element: D::Node, range: D::Range) -> DomResult<()> {
        self.close(dom);

        let body = dom.body().ok_or(DomError::Detached)?;
        dom.append_child(&body, &element)?;
        let subscription = match dom.subscribe_menu(&element) {
            Ok(subscription) => subscription,
            Err(err) => {
                if let Err(remove_err) = dom.remove(&element) {
                    log::warn!("could not remove unsubscribed font size menu: {}", remove_err);
                }
                return Err(err);
            }
        };

        *self = SizeMenu::Open(OpenMenu {
            element,
            range,
            subscription,
            opened_at: dom.now(),
        });
        Ok(())
    }

    /// Detach listeners and element. Returns the range the menu was opened
    /// for, or `None` if it was already closed.
    pub fn close(&mut self, dom: &mut D) -> Option<D::Range> {
        match std::mem::take(self) {
            SizeMenu::Open(open) => {
                dom.unsubscribe(open.subscription);
                if let Err(err) = dom.remove(&open.element) {
                    log::warn!("could not remove font size menu: {}", err);
                }
                Some(open.range)
            }
            SizeMenu::Closed => None,
        }
    }

    /// Whether a pointer-down should close the menu: outside the menu, not on
    /// the button, and past the grace period
    pub fn dismisses(&self, dom: &D, target: Option<&D::Node>, button: Option<&D::Node>, time: f64) -> bool {
        let SizeMenu::Open(open) = self else {
            return false;
        };
        if time - open.opened_at < MENU_GRACE_MS {
            return false;
        }
        match target {
            Some(target) => {
                !dom.contains(&open.element, target) && !button.is_some_and(|b| dom.contains(b, target))
            }
            None => true,
        }
    }

    /// The option a click inside the menu landed on
    pub fn choice_at(&self, dom: &D, target: &D::Node) -> Option<SizeChoice> {
        let menu = self.element()?;
        if !dom.contains(menu, target) {
            return None;
        }
        let start = if dom.is_element(target) {
            Some(target.clone())
        } else {
            dom.parent_element(target)
        };
        std::iter::successors(start, |el| dom.parent_element(el))
            .take_while(|el| el != menu)
            .find_map(|el| {
                if dom.attribute(&el, CLEAR_ATTRIBUTE).is_some() {
                    Some(SizeChoice::Clear)
                } else {
                    dom.attribute(&el, SIZE_ATTRIBUTE).map(SizeChoice::Size)
                }
            })
    }
}

/// Build the dropdown element (detached) for the given config and state
pub fn build<D: Dom>(dom: &mut D, config: &ToolConfig, state: &SelectionState, anchor: Rect) -> DomResult<D::Node> {
    let dropdown = dom.create_element("div")?;
    dom.add_class(&dropdown, DROPDOWN_CLASS)?;
    dom.set_style_property(&dropdown, "position", "fixed")?;
    dom.set_style_property(&dropdown, "left", &format!("{}px", anchor.left))?;
    dom.set_style_property(&dropdown, "top", &format!("{}px", anchor.bottom + MENU_OFFSET_PX))?;

    let highlighted = state.display_size().unwrap_or(&config.default_size);

    for option in &config.font_sizes {
        let item = dom.create_element("div")?;
        dom.add_class(&item, OPTION_CLASS)?;
        dom.set_attribute(&item, SIZE_ATTRIBUTE, &option.size)?;
        dom.set_style_property(&item, FONT_SIZE_PROPERTY, &option.size)?;
        if option.size == highlighted {
            dom.add_class(&item, OPTION_ACTIVE_CLASS)?;
        }
        let label = dom.create_text(&option.menu_text());
        dom.append_child(&item, &label)?;
        dom.append_child(&dropdown, &item)?;
    }

    if config.allow_clear {
        let item = dom.create_element("div")?;
        dom.add_class(&item, OPTION_CLASS)?;
        dom.add_class(&item, OPTION_CLEAR_CLASS)?;
        dom.set_attribute(&item, CLEAR_ATTRIBUTE, "")?;
        let label = dom.create_text(CLEAR_LABEL);
        dom.append_child(&item, &label)?;
        dom.append_child(&dropdown, &item)?;
    }

    Ok(dropdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::{Document, NodeId, Range};
    use crate::models::FontSizeOption;

    fn open_menu(doc: &mut Document, menu: &mut SizeMenu<Document>) -> NodeId {
        let config = ToolConfig::default();
        let element = build(doc, &config, &SelectionState::none(), Rect::default()).unwrap();
        let range = doc.select_node_contents(doc.body_id());
        menu.open(doc, element, range).unwrap();
        element
    }

    #[test]
    fn test_failed_subscribe_leaves_no_menu_behind() {
        let mut doc = Document::new();
        let mut menu = SizeMenu::<Document>::Closed;
        let not_an_element = doc.create_text("menu");
        let range = doc.select_node_contents(doc.body_id());

        assert_eq!(menu.open(&mut doc, not_an_element, range), Err(DomError::NotAnElement));

        assert!(!menu.is_open());
        assert_eq!(doc.parent(not_an_element), None);
        assert!(doc.children(doc.body_id()).is_empty());
        assert_eq!(doc.active_subscriptions(), 0);
    }

    #[test]
    fn test_build_lists_sizes_and_clear() {
        let mut doc = Document::new();
        let config = ToolConfig::default();
        let dropdown = build(&mut doc, &config, &SelectionState::none(), Rect { left: 10.0, bottom: 30.0 }).unwrap();

        let options = doc.children(dropdown).to_vec();
        assert_eq!(options.len(), 8);
        assert_eq!(doc.text_content(options[0]), "Small (12px)");
        assert_eq!(doc.element(options[0]).unwrap().style.get("font-size"), Some("12px"));
        assert!(doc.element(options[7]).unwrap().classes.contains(OPTION_CLEAR_CLASS));

        let style = &doc.element(dropdown).unwrap().style;
        assert_eq!(style.get("left"), Some("10px"));
        assert_eq!(style.get("top"), Some("38px"));
    }

    #[test]
    fn test_build_highlights_current_or_default() {
        let mut doc = Document::new();
        let config = ToolConfig {
            font_sizes: vec![FontSizeOption::new("14px", "Normal"), FontSizeOption::new("18px", "Large")],
            allow_clear: false,
            ..Default::default()
        };

        let dropdown = build(&mut doc, &config, &SelectionState::none(), Rect::default()).unwrap();
        let active: Vec<_> = doc.find_elements(dropdown, |el| el.classes.contains(OPTION_ACTIVE_CLASS));
        assert_eq!(active.len(), 1);
        assert_eq!(doc.element(active[0]).unwrap().attribute(SIZE_ATTRIBUTE), Some("14px"));

        let dropdown = build(&mut doc, &config, &SelectionState::sized("18px"), Rect::default()).unwrap();
        let active: Vec<_> = doc.find_elements(dropdown, |el| el.classes.contains(OPTION_ACTIVE_CLASS));
        assert_eq!(active.len(), 1);
        assert_eq!(doc.element(active[0]).unwrap().attribute(SIZE_ATTRIBUTE), Some("18px"));
        assert_eq!(doc.children(dropdown).len(), 2);
    }

    #[test]
    fn test_open_twice_keeps_one_menu() {
        let mut doc = Document::new();
        let mut menu = SizeMenu::default();
        let first = open_menu(&mut doc, &mut menu);
        let second = open_menu(&mut doc, &mut menu);

        let menus = doc.find_elements(doc.body_id(), |el| el.classes.contains(DROPDOWN_CLASS));
        assert_eq!(menus, vec![second]);
        assert_eq!(doc.parent(first), None);
        assert_eq!(doc.active_subscriptions(), 1);
    }

    #[test]
    fn test_close_releases_everything() {
        let mut doc = Document::new();
        let mut menu = SizeMenu::default();
        let element = open_menu(&mut doc, &mut menu);

        let range: Option<Range> = menu.close(&mut doc);
        assert!(range.is_some());
        assert!(!menu.is_open());
        assert_eq!(doc.parent(element), None);
        assert_eq!(doc.active_subscriptions(), 0);
        assert!(menu.close(&mut doc).is_none());
    }

    #[test]
    fn test_dismiss_rules() {
        let mut doc = Document::new();
        let button = doc.create_element("button");
        let outside = doc.create_element("p");
        let body = doc.body_id();
        doc.append(body, button).unwrap();
        doc.append(body, outside).unwrap();
        let mut menu = SizeMenu::default();
        let element = open_menu(&mut doc, &mut menu);
        let option = doc.children(element)[0];

        // the opening gesture
        assert!(!menu.dismisses(&doc, Some(&outside), Some(&button), 50.0));

        assert!(menu.dismisses(&doc, Some(&outside), Some(&button), 150.0));
        assert!(!menu.dismisses(&doc, Some(&option), Some(&button), 150.0));
        assert!(!menu.dismisses(&doc, Some(&button), Some(&button), 150.0));
    }

    #[test]
    fn test_choice_at_option_text() {
        let mut doc = Document::new();
        let mut menu = SizeMenu::default();
        let element = open_menu(&mut doc, &mut menu);
        let options = doc.children(element).to_vec();
        let label = doc.children(options[3])[0];

        assert_eq!(menu.choice_at(&doc, &label), Some(SizeChoice::size("18px")));
        assert_eq!(menu.choice_at(&doc, &options[7]), Some(SizeChoice::Clear));
        assert_eq!(menu.choice_at(&doc, &element), None);
        assert_eq!(menu.choice_at(&doc, &doc.body_id()), None);
    }
}
