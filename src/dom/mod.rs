//! Document backends
//!
//! The tool never talks to the browser directly. Every DOM primitive it
//! needs goes through [`Dom`], implemented by:
//!
//! - [`memory::Document`]: an arena document with DOM range semantics, used
//!   natively and by the test suite
//! - [`web::WebDom`]: the live browser document via `web_sys`

pub mod memory;
pub mod web;

use std::fmt;

use crate::error::DomResult;

/// Elements that are content on their own, even without text
pub const EMBEDDED_CONTENT: &[&str] = &[
    "img", "br", "hr", "svg", "video", "audio", "iframe", "embed", "object", "canvas", "input",
];

/// Viewport position of an element, enough to anchor a dropdown under it
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub bottom: f64,
}

/// Events delivered while the size menu is open
#[derive(Debug, Clone, PartialEq)]
pub enum MenuEvent<N> {
    /// Click inside the menu
    Click { target: Option<N> },
    /// Pointer pressed anywhere in the document, `time` in ms on [`Dom::now`]'s clock
    PointerDown { target: Option<N>, time: f64 },
}

/// DOM primitives used by the inspector, the transformer and the menu
pub trait Dom {
    /// Node handle; equality is node identity
    type Node: Clone + PartialEq + fmt::Debug;
    type Range: Clone;
    /// Live menu listeners, released by [`Dom::unsubscribe`]
    type Subscription;

    // ------------------------------------------------------------------
    // Tree queries
    // ------------------------------------------------------------------

    fn is_text(&self, node: &Self::Node) -> bool;

    fn is_element(&self, node: &Self::Node) -> bool;

    fn parent_element(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Parent of any kind, including documents and fragments
    fn parent_node(&self, node: &Self::Node) -> Option<Self::Node>;

    fn first_child(&self, node: &Self::Node) -> Option<Self::Node>;

    fn last_child(&self, node: &Self::Node) -> Option<Self::Node>;

    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Inclusive: a node contains itself
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool;

    fn text_content(&self, node: &Self::Node) -> String;

    /// No text and no [`EMBEDDED_CONTENT`] below the node
    fn is_empty(&self, node: &Self::Node) -> bool;

    /// Descendants of `root` with the given tag and class, in document order
    fn query_marked(&self, root: &Self::Node, tag: &str, class: &str) -> Vec<Self::Node>;

    // ------------------------------------------------------------------
    // Element attributes
    // ------------------------------------------------------------------

    /// Declared inline style value, `None` when absent or empty
    fn style_property(&self, element: &Self::Node, property: &str) -> Option<String>;

    fn set_style_property(&mut self, element: &Self::Node, property: &str, value: &str) -> DomResult<()>;

    fn remove_style_property(&mut self, element: &Self::Node, property: &str) -> DomResult<()>;

    /// Resolved font size of an element
    fn computed_font_size(&self, element: &Self::Node) -> Option<String>;

    fn has_class(&self, element: &Self::Node, class: &str) -> bool;

    fn add_class(&mut self, element: &Self::Node, class: &str) -> DomResult<()>;

    fn remove_class(&mut self, element: &Self::Node, class: &str) -> DomResult<()>;

    fn attribute(&self, element: &Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, element: &Self::Node, name: &str, value: &str) -> DomResult<()>;

    /// True when the element has no classes, no inline style and no other attributes
    fn is_bare(&self, element: &Self::Node) -> bool;

    // ------------------------------------------------------------------
    // Construction and mutation
    // ------------------------------------------------------------------

    fn create_element(&mut self, tag: &str) -> DomResult<Self::Node>;

    fn create_text(&mut self, text: &str) -> Self::Node;

    /// Copy of a node with its attributes but no children, detached
    fn clone_shallow(&mut self, node: &Self::Node) -> DomResult<Self::Node>;

    fn set_inner_html(&mut self, element: &Self::Node, markup: &str) -> DomResult<()>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> DomResult<()>;

    /// Insert before `reference`, or at the end when it is `None`
    fn insert_before(
        &mut self,
        parent: &Self::Node,
        child: &Self::Node,
        reference: Option<&Self::Node>,
    ) -> DomResult<()>;

    /// Detach a node from its parent; detached nodes are left alone
    fn remove(&mut self, node: &Self::Node) -> DomResult<()>;

    /// Replace an element by its children, keeping their order
    fn unwrap(&mut self, element: &Self::Node) -> DomResult<()>;

    // ------------------------------------------------------------------
    // Document
    // ------------------------------------------------------------------

    fn body(&self) -> Option<Self::Node>;

    fn head(&self) -> Option<Self::Node>;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    fn bounding_rect(&self, element: &Self::Node) -> Rect;

    /// Monotonic clock in milliseconds
    fn now(&self) -> f64;

    // ------------------------------------------------------------------
    // Range and selection
    // ------------------------------------------------------------------

    /// Remove the range's content and return it as a detached fragment.
    /// The range collapses to where the content was.
    fn extract_contents(&mut self, range: &mut Self::Range) -> DomResult<Self::Node>;

    /// Insert a node (or a fragment's children) at the range start
    fn insert_node(&mut self, range: &mut Self::Range, node: &Self::Node) -> DomResult<()>;

    fn range_start_container(&self, range: &Self::Range) -> DomResult<Self::Node>;

    /// Move the range end to the end of `node`'s children
    fn set_range_end_to_end_of(&mut self, range: &mut Self::Range, node: &Self::Node) -> DomResult<()>;

    /// Text of the current document selection
    fn selection_text(&self) -> String;

    /// Replace the selection with a caret right after `node`
    fn collapse_selection_after(&mut self, node: &Self::Node) -> DomResult<()>;

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    /// Start delivering [`MenuEvent`]s for an open menu
    fn subscribe_menu(&mut self, menu: &Self::Node) -> DomResult<Self::Subscription>;

    fn unsubscribe(&mut self, subscription: Self::Subscription);
}
