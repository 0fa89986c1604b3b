//! Selection-to-markup transformation
//!
//! Applying a size pulls the selected content out of the document, strips
//! every wrapper it already carries and puts it back inside a single fresh
//! wrapper. When the selection sits inside an existing wrapper, that wrapper
//! is split around the new content so wrappers never nest.

use crate::dom::Dom;
use crate::error::{DomError, DomResult};
use crate::models::{SelectionState, SizeChoice, FONT_SIZE_PROPERTY, MARKER_CLASS, WRAPPER_TAG};

/// Outcome of a successful transformation
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<N> {
    /// Node the caret was placed after
    pub caret_after: N,
    pub state: SelectionState,
}

/// Remove our size from every wrapper inside `root`, unwrapping wrappers
/// that carry nothing else. Returns how many wrappers were unwrapped.
pub fn strip_markers<D: Dom>(dom: &mut D, root: &D::Node) -> DomResult<usize> {
    let mut unwrapped = 0;
    for wrapper in dom.query_marked(root, WRAPPER_TAG, MARKER_CLASS) {
        dom.remove_style_property(&wrapper, FONT_SIZE_PROPERTY)?;
        dom.remove_class(&wrapper, MARKER_CLASS)?;
        if dom.is_bare(&wrapper) {
            dom.unwrap(&wrapper)?;
            unwrapped += 1;
        }
    }
    Ok(unwrapped)
}

/// Outermost wrapper enclosing `node`, if any
fn enclosing_wrapper<D: Dom>(dom: &D, node: &D::Node) -> Option<D::Node> {
    let start = if dom.is_element(node) {
        Some(node.clone())
    } else {
        dom.parent_element(node)
    };
    std::iter::successors(start, |el| dom.parent_element(el))
        .filter(|el| dom.has_class(el, MARKER_CLASS))
        .last()
}

/// Elements strictly between `node` and `wrapper`, innermost first, minus
/// any stray wrappers
fn formatting_between<D: Dom>(dom: &D, node: &D::Node, wrapper: &D::Node) -> Vec<D::Node> {
    let start = if dom.is_element(node) {
        Some(node.clone())
    } else {
        dom.parent_element(node)
    };
    std::iter::successors(start, |el| dom.parent_element(el))
        .take_while(|el| el != wrapper)
        .filter(|el| !dom.has_class(el, MARKER_CLASS))
        .collect()
}

/// Wrap `content` in shallow copies of `formatting`, innermost first
fn rewrap<D: Dom>(dom: &mut D, content: D::Node, formatting: &[D::Node]) -> DomResult<D::Node> {
    let mut content = content;
    for element in formatting {
        let copy = dom.clone_shallow(element)?;
        dom.append_child(&copy, &content)?;
        content = copy;
    }
    Ok(content)
}

/// Build what goes back into the document: the cleaned fragment, inside a
/// fresh wrapper when a size was chosen. Returns the payload and the node
/// the caret should follow.
fn payload<D: Dom>(dom: &mut D, content: D::Node, choice: &SizeChoice) -> DomResult<(D::Node, Option<D::Node>)> {
    match choice {
        SizeChoice::Size(size) => {
            let wrapper = dom.create_element(WRAPPER_TAG)?;
            dom.add_class(&wrapper, MARKER_CLASS)?;
            dom.set_style_property(&wrapper, FONT_SIZE_PROPERTY, size)?;
            dom.append_child(&wrapper, &content)?;
            Ok((wrapper.clone(), Some(wrapper)))
        }
        SizeChoice::Clear => {
            let last = if dom.is_element(&content) {
                Some(content.clone())
            } else {
                dom.last_child(&content)
            };
            Ok((content, last))
        }
    }
}

/// Apply `choice` to the content of `range`.
///
/// Returns `Ok(None)` without changing the document when the range holds
/// no text. On success the selection is a caret right after the new
/// content, outside any wrapper.
pub fn apply<D: Dom>(dom: &mut D, range: &mut D::Range, choice: &SizeChoice) -> DomResult<Option<Applied<D::Node>>> {
    let fragment = dom.extract_contents(range)?;
    if dom.text_content(&fragment).is_empty() {
        if dom.first_child(&fragment).is_some() {
            // put back whatever non-text content was selected
            dom.insert_node(range, &fragment)?;
        }
        return Ok(None);
    }

    let stripped = strip_markers(dom, &fragment)?;
    log::debug!("stripped {} existing font size wrapper(s)", stripped);

    let container = dom.range_start_container(range)?;
    let caret_after = match enclosing_wrapper(dom, &container) {
        Some(outer) => {
            let formatting = formatting_between(dom, &container, &outer);
            let content = rewrap(dom, fragment, &formatting)?;
            let (node, caret_after) = payload(dom, content, choice)?;
            split_around(dom, range, &outer, &node)?;
            caret_after
        }
        None => {
            let (node, caret_after) = payload(dom, fragment, choice)?;
            dom.insert_node(range, &node)?;
            caret_after
        }
    };

    let Some(caret_after) = caret_after else {
        return Ok(None);
    };
    dom.collapse_selection_after(&caret_after)?;

    let state = match choice {
        SizeChoice::Size(size) => SelectionState::sized(size.clone()),
        SizeChoice::Clear => SelectionState::none(),
    };
    Ok(Some(Applied { caret_after, state }))
}

/// Split `outer` at the collapsed `range` and put `node` between the halves.
/// Halves left without content are dropped.
fn split_around<D: Dom>(dom: &mut D, range: &mut D::Range, outer: &D::Node, node: &D::Node) -> DomResult<()> {
    dom.set_range_end_to_end_of(range, outer)?;
    let tail = dom.extract_contents(range)?;

    let parent = dom.parent_node(outer).ok_or(DomError::Detached)?;
    let next = dom.next_sibling(outer);

    dom.insert_before(&parent, node, next.as_ref())?;

    if !dom.is_empty(&tail) {
        let second = dom.clone_shallow(outer)?;
        dom.append_child(&second, &tail)?;
        dom.insert_before(&parent, &second, next.as_ref())?;
    }
    if dom.is_empty(outer) {
        dom.remove(outer)?;
    }
    Ok(())
}
