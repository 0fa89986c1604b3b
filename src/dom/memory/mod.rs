//! In-memory document
//!
//! An arena tree with just enough of the DOM to run the tool without a
//! browser: elements with classes and inline styles, text nodes, fragments,
//! live-range style extraction/insertion and a single-range selection.
//! Nodes are never freed; detaching only clears the parent link.

mod markup;
mod range;
mod style;

pub use markup::sanitize;
pub use range::{BoundaryPoint, Range};
pub use style::{ClassList, InlineStyle};

use std::collections::BTreeSet;

use crate::dom::{Dom, Rect, EMBEDDED_CONTENT};
use crate::error::{DomError, DomResult};

/// Font size of the root when nothing declares one
pub const ROOT_FONT_SIZE: &str = "16px";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub tag: String,
    pub classes: ClassList,
    pub style: InlineStyle,
    /// Every attribute other than `class` and `style`, in insertion order
    pub attributes: Vec<(String, String)>,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: ClassList::default(),
            style: InlineStyle::default(),
            attributes: Vec::new(),
        }
    }

    /// Plain attribute lookup; `class` and `style` live in their own fields
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "class" => self.classes = ClassList::parse(value),
            "style" => self.style = InlineStyle::parse(value),
            _ => match self.attributes.iter_mut().find(|(n, _)| *n == name) {
                Some(slot) => slot.1 = value.to_string(),
                None => self.attributes.push((name, value.to_string())),
            },
        }
    }

    pub fn remove_attribute(&mut self, name: &str) {
        match name {
            "class" => self.classes = ClassList::default(),
            "style" => self.style = InlineStyle::default(),
            _ => self.attributes.retain(|(n, _)| !n.eq_ignore_ascii_case(name)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Document,
    Fragment,
    Element(ElementData),
    Text(String),
    /// Opaque markup set through `set_inner_html`, serialized verbatim
    Raw(String),
}

#[derive(Debug, Clone)]
struct NodeEntry {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// Subscription handle for the in-memory backend
#[derive(Debug, PartialEq, Eq)]
pub struct MemorySubscription(u64);

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeEntry>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    selection: Option<Range>,
    clock: f64,
    next_subscription: u64,
    subscriptions: BTreeSet<u64>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document with a `head` and a `body`
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            selection: None,
            clock: 0.0,
            next_subscription: 1,
            subscriptions: BTreeSet::new(),
        };
        doc.root = doc.alloc(NodeData::Document);
        doc.head = doc.create_element("head");
        doc.body = doc.create_element("body");
        doc.nodes[doc.head.0].parent = Some(doc.root);
        doc.nodes[doc.body.0].parent = Some(doc.root);
        doc.nodes[doc.root.0].children = vec![doc.head, doc.body];
        doc
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeEntry {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    fn entry(&self, id: NodeId) -> &NodeEntry {
        &self.nodes[id.0]
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element(ElementData::new(tag)))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Text(text.to_string()))
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(NodeData::Fragment)
    }

    /// Copy of a node without its children, detached
    pub fn shallow_clone(&mut self, id: NodeId) -> NodeId {
        let data = self.entry(id).data.clone();
        self.alloc(data)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body_id(&self) -> NodeId {
        self.body
    }

    pub fn head_id(&self) -> NodeId {
        self.head
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.entry(id).data
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.entry(id).data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        match &mut self.nodes[id.0].data {
            NodeData::Element(el) => Ok(el),
            _ => Err(DomError::NotAnElement),
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.entry(id).data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.entry(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.entry(id).children
    }

    pub fn index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    /// DOM node length: chars for text, child count otherwise
    pub fn node_len(&self, id: NodeId) -> usize {
        match &self.entry(id).data {
            NodeData::Text(text) => text.chars().count(),
            _ => self.children(id).len(),
        }
    }

    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Inclusive ancestors from the node up to its root
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Descendants in tree order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    pub fn text_content(&self, id: NodeId) -> String {
        match &self.entry(id).data {
            NodeData::Text(text) => text.clone(),
            NodeData::Raw(_) => String::new(),
            _ => self
                .descendants(id)
                .into_iter()
                .filter_map(|n| self.text(n))
                .collect(),
        }
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.element(n).and_then(|el| el.attribute("id")) == Some(id))
    }

    /// Elements below `root` (tree order) matching a predicate
    pub fn find_elements(&self, root: NodeId, pred: impl Fn(&ElementData) -> bool) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|&n| self.element(n).is_some_and(&pred))
            .collect()
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Insert `child` before `reference` (or at the end). A fragment is
    /// replaced by its children.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) -> DomResult<()> {
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DomError::Js("cannot insert a node into itself".to_string()));
        }
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(DomError::Detached);
            }
        }
        let moved = match self.entry(child).data {
            NodeData::Fragment => std::mem::take(&mut self.nodes[child.0].children),
            _ => {
                self.detach(child);
                vec![child]
            }
        };
        let mut at = match reference {
            Some(reference) => self.index(reference).ok_or(DomError::Detached)?,
            None => self.children(parent).len(),
        };
        for node in moved {
            self.nodes[node.0].parent = Some(parent);
            self.nodes[parent.0].children.insert(at, node);
            at += 1;
        }
        Ok(())
    }

    pub fn append(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.insert_before(parent, child, None)
    }

    /// Replace the chars in `[from, to)` of a text node
    pub fn replace_chars(&mut self, id: NodeId, from: usize, to: usize, with: &str) -> DomResult<()> {
        let NodeData::Text(text) = &mut self.nodes[id.0].data else {
            return Err(DomError::NotAnElement);
        };
        let start = char_to_byte(text, from);
        let end = char_to_byte(text, to);
        text.replace_range(start..end, with);
        Ok(())
    }

    /// Split a text node at `offset`; the tail becomes the next sibling
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> DomResult<NodeId> {
        let len = self.node_len(id);
        if offset > len {
            return Err(DomError::InvalidBoundary { offset, len });
        }
        let tail = {
            let text = self.text(id).ok_or(DomError::NotAnElement)?;
            text.chars().skip(offset).collect::<String>()
        };
        let parent = self.parent(id).ok_or(DomError::Detached)?;
        self.replace_chars(id, offset, len, "")?;
        let new_node = self.create_text(&tail);
        let next = self
            .index(id)
            .and_then(|i| self.children(parent).get(i + 1).copied());
        self.insert_before(parent, new_node, next)?;
        Ok(new_node)
    }

    /// Move an element's children in front of it and drop it
    pub fn unwrap_element(&mut self, id: NodeId) -> DomResult<()> {
        let parent = self.parent(id).ok_or(DomError::Detached)?;
        let children = self.children(id).to_vec();
        for child in children {
            self.insert_before(parent, child, Some(id))?;
        }
        self.detach(id);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Selection and clock
    // ------------------------------------------------------------------

    pub fn selection(&self) -> Option<Range> {
        self.selection
    }

    pub fn set_selection(&mut self, range: Option<Range>) {
        self.selection = range;
    }

    /// Select `[from, to)` chars of a text node and return the range
    pub fn select_text(&mut self, text: NodeId, from: usize, to: usize) -> Range {
        let range = Range::new(BoundaryPoint::new(text, from), BoundaryPoint::new(text, to));
        self.selection = Some(range);
        range
    }

    /// Select all children of a node and return the range
    pub fn select_node_contents(&mut self, node: NodeId) -> Range {
        let range = Range::new(
            BoundaryPoint::new(node, 0),
            BoundaryPoint::new(node, self.node_len(node)),
        );
        self.selection = Some(range);
        range
    }

    pub fn anchor_node(&self) -> Option<NodeId> {
        self.selection.map(|r| r.start.node)
    }

    pub fn advance(&mut self, ms: f64) {
        self.clock += ms;
    }

    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    /// Nearest inclusive ancestor's declared font size, else the root size
    pub fn resolved_font_size(&self, id: NodeId) -> String {
        self.ancestors(id)
            .into_iter()
            .filter_map(|n| self.element(n))
            .find_map(|el| el.style.get("font-size").map(str::to_string))
            .unwrap_or_else(|| ROOT_FONT_SIZE.to_string())
    }
}

fn char_to_byte(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map(|(i, _)| i).unwrap_or(text.len())
}

impl Dom for Document {
    type Node = NodeId;
    type Range = Range;
    type Subscription = MemorySubscription;

    fn is_text(&self, node: &NodeId) -> bool {
        matches!(self.data(*node), NodeData::Text(_))
    }

    fn is_element(&self, node: &NodeId) -> bool {
        self.element(*node).is_some()
    }

    fn parent_element(&self, node: &NodeId) -> Option<NodeId> {
        self.parent(*node).filter(|p| self.element(*p).is_some())
    }

    fn parent_node(&self, node: &NodeId) -> Option<NodeId> {
        self.parent(*node)
    }

    fn first_child(&self, node: &NodeId) -> Option<NodeId> {
        self.children(*node).first().copied()
    }

    fn last_child(&self, node: &NodeId) -> Option<NodeId> {
        self.children(*node).last().copied()
    }

    fn next_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let parent = self.parent(*node)?;
        let index = self.index(*node)?;
        self.children(parent).get(index + 1).copied()
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        self.is_inclusive_ancestor(*ancestor, *node)
    }

    fn text_content(&self, node: &NodeId) -> String {
        Document::text_content(self, *node)
    }

    fn is_empty(&self, node: &NodeId) -> bool {
        Document::text_content(self, *node).is_empty()
            && self
                .find_elements(*node, |el| EMBEDDED_CONTENT.contains(&el.tag.as_str()))
                .is_empty()
            && !self
                .descendants(*node)
                .into_iter()
                .any(|n| matches!(self.data(n), NodeData::Raw(_)))
    }

    fn query_marked(&self, root: &NodeId, tag: &str, class: &str) -> Vec<NodeId> {
        self.find_elements(*root, |el| el.tag.eq_ignore_ascii_case(tag) && el.classes.contains(class))
    }

    fn style_property(&self, element: &NodeId, property: &str) -> Option<String> {
        self.element(*element)?
            .style
            .get(property)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn set_style_property(&mut self, element: &NodeId, property: &str, value: &str) -> DomResult<()> {
        self.element_mut(*element)?.style.set(property, value);
        Ok(())
    }

    fn remove_style_property(&mut self, element: &NodeId, property: &str) -> DomResult<()> {
        self.element_mut(*element)?.style.remove(property);
        Ok(())
    }

    fn computed_font_size(&self, element: &NodeId) -> Option<String> {
        self.element(*element)?;
        Some(self.resolved_font_size(*element))
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.element(*element).is_some_and(|el| el.classes.contains(class))
    }

    fn add_class(&mut self, element: &NodeId, class: &str) -> DomResult<()> {
        self.element_mut(*element)?.classes.add(class);
        Ok(())
    }

    fn remove_class(&mut self, element: &NodeId, class: &str) -> DomResult<()> {
        self.element_mut(*element)?.classes.remove(class);
        Ok(())
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        let el = self.element(*element)?;
        match name {
            "class" => Some(el.classes.value()).filter(|v| !v.is_empty()),
            "style" => Some(el.style.css_text()).filter(|v| !v.is_empty()),
            _ => el.attribute(name).map(str::to_string),
        }
    }

    fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) -> DomResult<()> {
        self.element_mut(*element)?.set_attribute(name, value);
        Ok(())
    }

    fn is_bare(&self, element: &NodeId) -> bool {
        self.element(*element)
            .is_some_and(|el| el.classes.is_empty() && el.style.is_empty() && el.attributes.is_empty())
    }

    fn create_element(&mut self, tag: &str) -> DomResult<NodeId> {
        Ok(Document::create_element(self, tag))
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        Document::create_text(self, text)
    }

    fn clone_shallow(&mut self, node: &NodeId) -> DomResult<NodeId> {
        Ok(self.shallow_clone(*node))
    }

    fn set_inner_html(&mut self, element: &NodeId, markup: &str) -> DomResult<()> {
        self.element(*element).ok_or(DomError::NotAnElement)?;
        for child in self.children(*element).to_vec() {
            self.detach(child);
        }
        let raw = self.alloc(NodeData::Raw(markup.to_string()));
        self.append(*element, raw)
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> DomResult<()> {
        self.append(*parent, *child)
    }

    fn insert_before(&mut self, parent: &NodeId, child: &NodeId, reference: Option<&NodeId>) -> DomResult<()> {
        Document::insert_before(self, *parent, *child, reference.copied())
    }

    fn remove(&mut self, node: &NodeId) -> DomResult<()> {
        self.detach(*node);
        Ok(())
    }

    fn unwrap(&mut self, element: &NodeId) -> DomResult<()> {
        self.unwrap_element(*element)
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn head(&self) -> Option<NodeId> {
        Some(self.head)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.get_element_by_id(id)
    }

    fn bounding_rect(&self, _element: &NodeId) -> Rect {
        Rect::default()
    }

    fn now(&self) -> f64 {
        self.clock
    }

    fn extract_contents(&mut self, range: &mut Range) -> DomResult<NodeId> {
        Document::extract_contents(self, range)
    }

    fn insert_node(&mut self, range: &mut Range, node: &NodeId) -> DomResult<()> {
        Document::insert_node(self, range, *node)
    }

    fn range_start_container(&self, range: &Range) -> DomResult<NodeId> {
        Ok(range.start.node)
    }

    fn set_range_end_to_end_of(&mut self, range: &mut Range, node: &NodeId) -> DomResult<()> {
        range.end = BoundaryPoint::new(*node, self.node_len(*node));
        Ok(())
    }

    fn selection_text(&self) -> String {
        self.selection
            .map(|range| self.range_text(&range))
            .unwrap_or_default()
    }

    fn collapse_selection_after(&mut self, node: &NodeId) -> DomResult<()> {
        let parent = self.parent(*node).ok_or(DomError::Detached)?;
        let index = self.index(*node).ok_or(DomError::Detached)?;
        self.selection = Some(Range::collapsed(BoundaryPoint::new(parent, index + 1)));
        Ok(())
    }

    fn subscribe_menu(&mut self, menu: &NodeId) -> DomResult<MemorySubscription> {
        self.element(*menu).ok_or(DomError::NotAnElement)?;
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscriptions.insert(id);
        Ok(MemorySubscription(id))
    }

    fn unsubscribe(&mut self, subscription: MemorySubscription) {
        self.subscriptions.remove(&subscription.0);
    }
}
