//! Browser document backend
//!
//! Thin mapping of [`Dom`] onto `web_sys`. Menu events are forwarded to a
//! sink installed by the API layer; listeners live in a [`WebSubscription`]
//! and are removed when it is dropped.

use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DocumentFragment, Element, Event, HtmlElement, Node, Range, Window};

use crate::dom::{Dom, MenuEvent, Rect, EMBEDDED_CONTENT};
use crate::error::{DomError, DomResult};

/// Receiver for events raised by an open menu
pub type MenuSink = Rc<dyn Fn(MenuEvent<Node>)>;

fn js_err(err: JsValue) -> DomError {
    DomError::Js(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

fn as_element(node: &Node) -> DomResult<&Element> {
    node.dyn_ref::<Element>().ok_or(DomError::NotAnElement)
}

fn as_html(node: &Node) -> DomResult<&HtmlElement> {
    node.dyn_ref::<HtmlElement>().ok_or(DomError::NotAnElement)
}

fn event_target(event: &Event) -> Option<Node> {
    event.target().and_then(|t| t.dyn_into::<Node>().ok())
}

pub struct WebDom {
    window: Window,
    document: web_sys::Document,
    sink: Option<MenuSink>,
}

impl WebDom {
    pub fn new() -> DomResult<Self> {
        let window = web_sys::window().ok_or_else(|| DomError::Js("no global window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| DomError::Js("window has no document".to_string()))?;
        Ok(Self {
            window,
            document,
            sink: None,
        })
    }

    pub fn document(&self) -> &web_sys::Document {
        &self.document
    }

    pub fn set_menu_sink(&mut self, sink: MenuSink) {
        self.sink = Some(sink);
    }
}

/// Listeners of one open menu: delegated clicks on the menu, pointer-downs
/// on the document
pub struct WebSubscription {
    menu: Node,
    document: web_sys::Document,
    click: Closure<dyn FnMut(Event)>,
    pointer_down: Closure<dyn FnMut(Event)>,
}

impl Drop for WebSubscription {
    fn drop(&mut self) {
        let _ = self
            .menu
            .remove_event_listener_with_callback("click", self.click.as_ref().unchecked_ref());
        let _ = self
            .document
            .remove_event_listener_with_callback("pointerdown", self.pointer_down.as_ref().unchecked_ref());
    }
}

impl Dom for WebDom {
    type Node = Node;
    type Range = Range;
    type Subscription = WebSubscription;

    fn is_text(&self, node: &Node) -> bool {
        node.node_type() == Node::TEXT_NODE
    }

    fn is_element(&self, node: &Node) -> bool {
        node.node_type() == Node::ELEMENT_NODE
    }

    fn parent_element(&self, node: &Node) -> Option<Node> {
        node.parent_element().map(Into::into)
    }

    fn parent_node(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn first_child(&self, node: &Node) -> Option<Node> {
        node.first_child()
    }

    fn last_child(&self, node: &Node) -> Option<Node> {
        node.last_child()
    }

    fn next_sibling(&self, node: &Node) -> Option<Node> {
        node.next_sibling()
    }

    fn contains(&self, ancestor: &Node, node: &Node) -> bool {
        ancestor.contains(Some(node))
    }

    fn text_content(&self, node: &Node) -> String {
        node.text_content().unwrap_or_default()
    }

    fn is_empty(&self, node: &Node) -> bool {
        if !self.text_content(node).is_empty() {
            return false;
        }
        let selector = EMBEDDED_CONTENT.join(",");
        let found = if let Some(el) = node.dyn_ref::<Element>() {
            el.query_selector(&selector)
        } else if let Some(frag) = node.dyn_ref::<DocumentFragment>() {
            frag.query_selector(&selector)
        } else {
            return true;
        };
        matches!(found, Ok(None))
    }

    fn query_marked(&self, root: &Node, tag: &str, class: &str) -> Vec<Node> {
        let selector = format!("{}.{}", tag, class);
        let list = if let Some(el) = root.dyn_ref::<Element>() {
            el.query_selector_all(&selector)
        } else if let Some(frag) = root.dyn_ref::<DocumentFragment>() {
            frag.query_selector_all(&selector)
        } else {
            return Vec::new();
        };
        match list {
            Ok(list) => (0..list.length()).filter_map(|i| list.item(i)).collect(),
            Err(err) => {
                log::warn!("query '{}' failed: {}", selector, js_err(err));
                Vec::new()
            }
        }
    }

    fn style_property(&self, element: &Node, property: &str) -> Option<String> {
        as_html(element)
            .ok()?
            .style()
            .get_property_value(property)
            .ok()
            .filter(|v| !v.is_empty())
    }

    fn set_style_property(&mut self, element: &Node, property: &str, value: &str) -> DomResult<()> {
        as_html(element)?.style().set_property(property, value).map_err(js_err)
    }

    fn remove_style_property(&mut self, element: &Node, property: &str) -> DomResult<()> {
        as_html(element)?
            .style()
            .remove_property(property)
            .map(|_| ())
            .map_err(js_err)
    }

    fn computed_font_size(&self, element: &Node) -> Option<String> {
        let element = as_element(element).ok()?;
        self.window
            .get_computed_style(element)
            .ok()
            .flatten()?
            .get_property_value("font-size")
            .ok()
            .filter(|v| !v.is_empty())
    }

    fn has_class(&self, element: &Node, class: &str) -> bool {
        as_element(element).is_ok_and(|el| el.class_list().contains(class))
    }

    fn add_class(&mut self, element: &Node, class: &str) -> DomResult<()> {
        as_element(element)?.class_list().add_1(class).map_err(js_err)
    }

    fn remove_class(&mut self, element: &Node, class: &str) -> DomResult<()> {
        as_element(element)?.class_list().remove_1(class).map_err(js_err)
    }

    fn attribute(&self, element: &Node, name: &str) -> Option<String> {
        as_element(element).ok()?.get_attribute(name)
    }

    fn set_attribute(&mut self, element: &Node, name: &str, value: &str) -> DomResult<()> {
        as_element(element)?.set_attribute(name, value).map_err(js_err)
    }

    fn is_bare(&self, element: &Node) -> bool {
        let Ok(el) = as_element(element) else {
            return false;
        };
        // Emptied `class`/`style` attributes linger after their last token goes
        el.get_attribute_names().iter().all(|name| match name.as_string().as_deref() {
            Some(attr @ ("class" | "style")) => el
                .get_attribute(attr)
                .map_or(true, |value| value.trim().is_empty()),
            _ => false,
        })
    }

    fn create_element(&mut self, tag: &str) -> DomResult<Node> {
        self.document.create_element(tag).map(Into::into).map_err(js_err)
    }

    fn create_text(&mut self, text: &str) -> Node {
        self.document.create_text_node(text).into()
    }

    fn clone_shallow(&mut self, node: &Node) -> DomResult<Node> {
        node.clone_node().map_err(js_err)
    }

    fn set_inner_html(&mut self, element: &Node, markup: &str) -> DomResult<()> {
        as_element(element)?.set_inner_html(markup);
        Ok(())
    }

    fn append_child(&mut self, parent: &Node, child: &Node) -> DomResult<()> {
        parent.append_child(child).map(|_| ()).map_err(js_err)
    }

    fn insert_before(&mut self, parent: &Node, child: &Node, reference: Option<&Node>) -> DomResult<()> {
        parent.insert_before(child, reference).map(|_| ()).map_err(js_err)
    }

    fn remove(&mut self, node: &Node) -> DomResult<()> {
        match node.parent_node() {
            Some(parent) => parent.remove_child(node).map(|_| ()).map_err(js_err),
            None => Ok(()),
        }
    }

    fn unwrap(&mut self, element: &Node) -> DomResult<()> {
        let parent = element.parent_node().ok_or(DomError::Detached)?;
        while let Some(child) = element.first_child() {
            parent.insert_before(&child, Some(element)).map_err(js_err)?;
        }
        parent.remove_child(element).map(|_| ()).map_err(js_err)
    }

    fn body(&self) -> Option<Node> {
        self.document.body().map(Into::into)
    }

    fn head(&self) -> Option<Node> {
        self.document.head().map(Into::into)
    }

    fn element_by_id(&self, id: &str) -> Option<Node> {
        self.document.get_element_by_id(id).map(Into::into)
    }

    fn bounding_rect(&self, element: &Node) -> Rect {
        match as_element(element) {
            Ok(el) => {
                let rect = el.get_bounding_client_rect();
                Rect {
                    left: rect.left(),
                    bottom: rect.bottom(),
                }
            }
            Err(_) => Rect::default(),
        }
    }

    fn now(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }

    fn extract_contents(&mut self, range: &mut Range) -> DomResult<Node> {
        range.extract_contents().map(Into::into).map_err(js_err)
    }

    fn insert_node(&mut self, range: &mut Range, node: &Node) -> DomResult<()> {
        range.insert_node(node).map_err(js_err)
    }

    fn range_start_container(&self, range: &Range) -> DomResult<Node> {
        range.start_container().map_err(js_err)
    }

    fn set_range_end_to_end_of(&mut self, range: &mut Range, node: &Node) -> DomResult<()> {
        range.set_end(node, node.child_nodes().length()).map_err(js_err)
    }

    fn selection_text(&self) -> String {
        self.window
            .get_selection()
            .ok()
            .flatten()
            .map(|selection| String::from(selection.to_string()))
            .unwrap_or_default()
    }

    fn collapse_selection_after(&mut self, node: &Node) -> DomResult<()> {
        let selection = self
            .window
            .get_selection()
            .map_err(js_err)?
            .ok_or_else(|| DomError::Js("no selection".to_string()))?;
        selection.remove_all_ranges().map_err(js_err)?;

        let caret = self.document.create_range().map_err(js_err)?;
        caret.set_start_after(node).map_err(js_err)?;
        caret.collapse_with_to_start(true);
        selection.add_range(&caret).map_err(js_err)
    }

    fn subscribe_menu(&mut self, menu: &Node) -> DomResult<WebSubscription> {
        let sink = self
            .sink
            .clone()
            .ok_or_else(|| DomError::Js("menu events have no receiver".to_string()))?;

        let click_sink = sink.clone();
        let click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            click_sink(MenuEvent::Click {
                target: event_target(&event),
            });
        });
        let pointer_down = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            sink(MenuEvent::PointerDown {
                target: event_target(&event),
                time: event.time_stamp(),
            });
        });

        menu.add_event_listener_with_callback("click", click.as_ref().unchecked_ref())
            .map_err(js_err)?;
        if let Err(err) = self
            .document
            .add_event_listener_with_callback("pointerdown", pointer_down.as_ref().unchecked_ref())
        {
            let _ = menu.remove_event_listener_with_callback("click", click.as_ref().unchecked_ref());
            return Err(js_err(err));
        }

        Ok(WebSubscription {
            menu: menu.clone(),
            document: self.document.clone(),
            click,
            pointer_down,
        })
    }

    fn unsubscribe(&mut self, subscription: WebSubscription) {
        drop(subscription);
    }
}
