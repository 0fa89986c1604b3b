//! Reading and writing inline markup
//!
//! Block content is stored by the host as inline HTML. Only well-formed XML
//! markup is accepted: every element must be closed (`<br/>`, not `<br>`)
//! and only the XML entities are known. The writer closes every element
//! explicitly, so its output reads back through the same parser.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{Document, NodeData, NodeId};
use crate::error::{DomError, DomResult};
use crate::models::SanitizeConfig;

impl Document {
    /// Parse markup into a new detached fragment
    pub fn parse_fragment(&mut self, markup: &str) -> DomResult<NodeId> {
        let fragment = self.create_fragment();
        let mut stack = vec![fragment];
        let mut reader = Reader::from_str(markup);

        loop {
            let parent = *stack.last().ok_or_else(|| DomError::Markup("unbalanced end tag".to_string()))?;
            match reader.read_event() {
                Ok(Event::Start(start)) => {
                    let element = self.element_from_tag(&start)?;
                    self.append(parent, element)?;
                    stack.push(element);
                }
                Ok(Event::Empty(start)) => {
                    let element = self.element_from_tag(&start)?;
                    self.append(parent, element)?;
                }
                Ok(Event::End(_)) => {
                    if stack.len() == 1 {
                        return Err(DomError::Markup("unbalanced end tag".to_string()));
                    }
                    stack.pop();
                }
                Ok(Event::Text(text)) => {
                    let text = text.unescape().map_err(|e| DomError::Markup(e.to_string()))?;
                    if !text.is_empty() {
                        let node = self.create_text(&text);
                        self.append(parent, node)?;
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(DomError::Markup(e.to_string())),
            }
        }

        if stack.len() != 1 {
            return Err(DomError::Markup("unclosed element".to_string()));
        }
        Ok(fragment)
    }

    /// Parse markup and append it to `parent`
    pub fn append_markup(&mut self, parent: NodeId, markup: &str) -> DomResult<()> {
        let fragment = self.parse_fragment(markup)?;
        self.append(parent, fragment)
    }

    fn element_from_tag(&mut self, start: &BytesStart) -> DomResult<NodeId> {
        let tag = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| DomError::Markup(e.to_string()))?
            .to_string();
        let element = self.create_element(&tag);
        for attr in start.attributes() {
            let attr = attr.map_err(|e| DomError::Markup(e.to_string()))?;
            let name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| DomError::Markup(e.to_string()))?
                .to_string();
            let value = attr.unescape_value().map_err(|e| DomError::Markup(e.to_string()))?;
            self.element_mut(element)?.set_attribute(&name, &value);
        }
        Ok(element)
    }

    /// Markup of a node including the node itself
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Markup of a node's children
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.data(id) {
            NodeData::Text(text) => out.push_str(&escape_text(text)),
            NodeData::Raw(raw) => out.push_str(raw),
            NodeData::Document | NodeData::Fragment => {
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
            }
            NodeData::Element(el) => {
                out.push('<');
                out.push_str(&el.tag);
                if !el.classes.is_empty() {
                    out.push_str(&format!(" class=\"{}\"", escape_attr(&el.classes.value())));
                }
                if !el.style.is_empty() {
                    out.push_str(&format!(" style=\"{}\"", escape_attr(&el.style.css_text())));
                }
                for (name, value) in &el.attributes {
                    out.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
                }
                out.push('>');
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
                out.push_str(&format!("</{}>", el.tag));
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Apply the persisted-markup allow-list below `root`.
///
/// Spans without the marker class are unwrapped; marked spans keep only the
/// marker class and, when allowed, their inline style. Other elements are
/// left to the host's other tools.
pub fn sanitize(doc: &mut Document, root: NodeId, config: &SanitizeConfig) -> DomResult<()> {
    let spans = doc.find_elements(root, |el| el.tag == "span");
    for span in spans {
        let keep = doc.element(span).is_some_and(|el| el.classes.contains(&config.span.class));
        if !keep {
            doc.unwrap_element(span)?;
            continue;
        }
        let el = doc.element_mut(span)?;
        el.attributes.clear();
        el.set_attribute("class", &config.span.class);
        if !config.span.style {
            el.remove_attribute("style");
        }
    }
    Ok(())
}
