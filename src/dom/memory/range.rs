//! Ranges over the in-memory document
//!
//! Boundary points are `(node, offset)` pairs: a char offset inside a text
//! node, a child index anywhere else. Extraction and insertion follow the
//! DOM Range algorithms, including cloning of partially selected ancestors.

use std::cmp::Ordering;

use super::{Document, NodeId};
use crate::error::{DomError, DomResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundaryPoint {
    pub node: NodeId,
    pub offset: usize,
}

impl BoundaryPoint {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: BoundaryPoint,
    pub end: BoundaryPoint,
}

impl Range {
    pub fn new(start: BoundaryPoint, end: BoundaryPoint) -> Self {
        Self { start, end }
    }

    pub fn collapsed(point: BoundaryPoint) -> Self {
        Self { start: point, end: point }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

impl Document {
    /// Child indices from the root down to `node`, followed by `offset`.
    /// Lexicographic order on these keys is tree order on boundary points.
    fn point_key(&self, point: BoundaryPoint) -> Vec<usize> {
        let mut key: Vec<usize> = self
            .ancestors(point.node)
            .into_iter()
            .filter_map(|n| self.index(n))
            .collect();
        key.reverse();
        key.push(point.offset);
        key
    }

    pub fn compare_points(&self, a: BoundaryPoint, b: BoundaryPoint) -> Ordering {
        if a.node == b.node {
            return a.offset.cmp(&b.offset);
        }
        self.point_key(a).cmp(&self.point_key(b))
    }

    fn check_point(&self, point: BoundaryPoint) -> DomResult<()> {
        let len = self.node_len(point.node);
        if point.offset > len {
            return Err(DomError::InvalidBoundary { offset: point.offset, len });
        }
        Ok(())
    }

    fn is_contained(&self, node: NodeId, range: &Range) -> bool {
        let node_start = BoundaryPoint::new(node, 0);
        let node_end = BoundaryPoint::new(node, self.node_len(node));
        self.compare_points(node_start, range.start) == Ordering::Greater
            && self.compare_points(node_end, range.end) == Ordering::Less
    }

    fn common_ancestor(&self, a: NodeId, b: NodeId) -> DomResult<NodeId> {
        self.ancestors(a)
            .into_iter()
            .find(|&n| self.is_inclusive_ancestor(n, b))
            .ok_or(DomError::Detached)
    }

    /// Child of `ancestor` on the path down to `node`
    fn child_towards(&self, ancestor: NodeId, node: NodeId) -> Option<NodeId> {
        self.ancestors(node)
            .into_iter()
            .find(|&n| self.parent(n) == Some(ancestor))
    }

    fn slice_text(&self, node: NodeId, from: usize, to: usize) -> String {
        self.text(node)
            .map(|t| t.chars().skip(from).take(to.saturating_sub(from)).collect())
            .unwrap_or_default()
    }

    /// Move the range's content into a new fragment and collapse the range.
    /// Partially selected text is cut; empty leftovers are not copied.
    pub fn extract_contents(&mut self, range: &mut Range) -> DomResult<NodeId> {
        self.check_point(range.start)?;
        self.check_point(range.end)?;
        if self.compare_points(range.start, range.end) == Ordering::Greater {
            return Err(DomError::InvalidBoundary {
                offset: range.start.offset,
                len: range.end.offset,
            });
        }

        let fragment = self.create_fragment();
        if range.is_collapsed() {
            return Ok(fragment);
        }

        let Range { start, end } = *range;

        if start.node == end.node && self.text(start.node).is_some() {
            let extracted = self.slice_text(start.node, start.offset, end.offset);
            let clone = self.create_text(&extracted);
            self.append(fragment, clone)?;
            self.replace_chars(start.node, start.offset, end.offset, "")?;
            range.end = range.start;
            return Ok(fragment);
        }

        let common = self.common_ancestor(start.node, end.node)?;
        let first_partial = if self.is_inclusive_ancestor(start.node, end.node) {
            None
        } else {
            self.child_towards(common, start.node)
        };
        let last_partial = if self.is_inclusive_ancestor(end.node, start.node) {
            None
        } else {
            self.child_towards(common, end.node)
        };
        let contained: Vec<NodeId> = self
            .children(common)
            .iter()
            .copied()
            .filter(|&c| self.is_contained(c, range))
            .collect();

        let new_point = if self.is_inclusive_ancestor(start.node, end.node) {
            start
        } else {
            let mut reference = start.node;
            loop {
                let parent = self.parent(reference).ok_or(DomError::Detached)?;
                if self.is_inclusive_ancestor(parent, end.node) {
                    let index = self.index(reference).ok_or(DomError::Detached)?;
                    break BoundaryPoint::new(parent, index + 1);
                }
                reference = parent;
            }
        };

        if let Some(first) = first_partial {
            if self.text(first).is_some() {
                let len = self.node_len(first);
                let extracted = self.slice_text(first, start.offset, len);
                if !extracted.is_empty() {
                    let clone = self.create_text(&extracted);
                    self.append(fragment, clone)?;
                }
                self.replace_chars(first, start.offset, len, "")?;
            } else {
                let clone = self.shallow_clone(first);
                self.append(fragment, clone)?;
                let mut sub = Range::new(start, BoundaryPoint::new(first, self.node_len(first)));
                let inner = self.extract_contents(&mut sub)?;
                self.append(clone, inner)?;
            }
        }

        for child in contained {
            self.append(fragment, child)?;
        }

        if let Some(last) = last_partial {
            if self.text(last).is_some() {
                let extracted = self.slice_text(last, 0, end.offset);
                if !extracted.is_empty() {
                    let clone = self.create_text(&extracted);
                    self.append(fragment, clone)?;
                }
                self.replace_chars(last, 0, end.offset, "")?;
            } else {
                let clone = self.shallow_clone(last);
                self.append(fragment, clone)?;
                let mut sub = Range::new(BoundaryPoint::new(last, 0), end);
                let inner = self.extract_contents(&mut sub)?;
                self.append(clone, inner)?;
            }
        }

        *range = Range::collapsed(new_point);
        Ok(fragment)
    }

    /// Insert `node` at the range start, splitting a text container.
    /// Text is only split strictly inside, so no empty text nodes appear.
    /// A collapsed range grows to cover the inserted content.
    pub fn insert_node(&mut self, range: &mut Range, node: NodeId) -> DomResult<()> {
        self.check_point(range.start)?;
        let start = range.start;

        let (parent, reference) = if self.text(start.node).is_some() {
            let parent = self.parent(start.node).ok_or(DomError::Detached)?;
            let len = self.node_len(start.node);
            let reference = if start.offset == 0 {
                Some(start.node)
            } else if start.offset == len {
                let index = self.index(start.node).ok_or(DomError::Detached)?;
                self.children(parent).get(index + 1).copied()
            } else {
                Some(self.split_text(start.node, start.offset)?)
            };
            (parent, reference)
        } else {
            (start.node, self.children(start.node).get(start.offset).copied())
        };

        let was_collapsed = range.is_collapsed();

        self.insert_before(parent, node, reference)?;

        if was_collapsed {
            let offset = match reference {
                Some(reference) => self.index(reference).ok_or(DomError::Detached)?,
                None => self.children(parent).len(),
            };
            range.end = BoundaryPoint::new(parent, offset);
        }
        Ok(())
    }

    /// Text covered by a range, in document order
    pub fn range_text(&self, range: &Range) -> String {
        let mut out = String::new();
        let mut inside = false;
        self.collect_range_text(self.root_of(range.start.node), range, &mut inside, &mut out);
        out
    }

    fn root_of(&self, node: NodeId) -> NodeId {
        self.ancestors(node).last().copied().unwrap_or(node)
    }

    fn collect_range_text(&self, node: NodeId, range: &Range, inside: &mut bool, out: &mut String) {
        let at = |offset: usize, inside: &mut bool| {
            let point = BoundaryPoint::new(node, offset);
            if point == range.start {
                *inside = true;
            }
            if point == range.end {
                *inside = false;
            }
        };

        if let Some(text) = self.text(node) {
            for (offset, ch) in text.chars().enumerate() {
                at(offset, inside);
                if *inside {
                    out.push(ch);
                }
            }
            at(text.chars().count(), inside);
            return;
        }

        let children = self.children(node);
        for (offset, &child) in children.iter().enumerate() {
            at(offset, inside);
            self.collect_range_text(child, range, inside, out);
        }
        at(children.len(), inside);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// body > p > ["Say ", b > "bold", " end"]
    fn fixture() -> (Document, NodeId, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        let t1 = doc.create_text("Say ");
        let b = doc.create_element("b");
        let bt = doc.create_text("bold");
        let t2 = doc.create_text(" end");
        let body = doc.body_id();
        doc.append(body, p).unwrap();
        doc.append(p, t1).unwrap();
        doc.append(p, b).unwrap();
        doc.append(b, bt).unwrap();
        doc.append(p, t2).unwrap();
        (doc, p, t1, bt, t2)
    }

    #[test]
    fn test_compare_points_tree_order() {
        let (doc, p, t1, bt, t2) = fixture();
        let b = doc.parent(bt).unwrap();
        assert_eq!(
            doc.compare_points(BoundaryPoint::new(t1, 3), BoundaryPoint::new(bt, 0)),
            Ordering::Less
        );
        assert_eq!(
            doc.compare_points(BoundaryPoint::new(p, 1), BoundaryPoint::new(bt, 0)),
            Ordering::Less
        );
        assert_eq!(
            doc.compare_points(BoundaryPoint::new(p, 2), BoundaryPoint::new(bt, 4)),
            Ordering::Greater
        );
        assert_eq!(
            doc.compare_points(BoundaryPoint::new(b, 1), BoundaryPoint::new(t2, 0)),
            Ordering::Less
        );
    }

    #[test]
    fn test_extract_within_single_text() {
        let (mut doc, p, t1, _, _) = fixture();
        let mut range = Range::new(BoundaryPoint::new(t1, 0), BoundaryPoint::new(t1, 3));

        let frag = doc.extract_contents(&mut range).unwrap();

        assert_eq!(doc.text_content(frag), "Say");
        assert_eq!(doc.text(t1), Some(" "));
        assert!(range.is_collapsed());
        assert_eq!(range.start, BoundaryPoint::new(t1, 0));
        assert_eq!(doc.text_content(p), " bold end");
    }

    #[test]
    fn test_extract_across_partial_element() {
        let (mut doc, p, t1, bt, _) = fixture();
        // "y " + "bo"
        let mut range = Range::new(BoundaryPoint::new(t1, 2), BoundaryPoint::new(bt, 2));

        let frag = doc.extract_contents(&mut range).unwrap();

        assert_eq!(doc.text_content(frag), "y bo");
        let frag_children = doc.children(frag).to_vec();
        assert_eq!(frag_children.len(), 2);
        assert_eq!(doc.element(frag_children[1]).unwrap().tag, "b");
        assert_eq!(doc.text_content(p), "Sald end");
        assert_eq!(range.start, BoundaryPoint::new(p, 1));
    }

    #[test]
    fn test_extract_moves_contained_children() {
        let (mut doc, p, t1, _, t2) = fixture();
        let b = doc.children(p)[1];
        let mut range = Range::new(BoundaryPoint::new(t1, 4), BoundaryPoint::new(t2, 0));

        let frag = doc.extract_contents(&mut range).unwrap();

        assert_eq!(doc.children(frag), &[b]);
        assert_eq!(doc.text_content(p), "Say  end");
    }

    #[test]
    fn test_extract_collapsed_is_empty() {
        let (mut doc, p, t1, _, _) = fixture();
        let mut range = Range::collapsed(BoundaryPoint::new(t1, 1));
        let frag = doc.extract_contents(&mut range).unwrap();
        assert!(doc.children(frag).is_empty());
        assert_eq!(doc.text_content(p), "Say bold end");
    }

    #[test]
    fn test_extract_rejects_bad_offset() {
        let (mut doc, _, t1, _, _) = fixture();
        let mut range = Range::new(BoundaryPoint::new(t1, 0), BoundaryPoint::new(t1, 99));
        assert!(matches!(
            doc.extract_contents(&mut range),
            Err(DomError::InvalidBoundary { offset: 99, .. })
        ));
    }

    #[test]
    fn test_insert_splits_text() {
        let (mut doc, p, t1, _, _) = fixture();
        let span = doc.create_element("span");
        let mut range = Range::collapsed(BoundaryPoint::new(t1, 2));

        doc.insert_node(&mut range, span).unwrap();

        let children = doc.children(p).to_vec();
        assert_eq!(children[0], t1);
        assert_eq!(children[1], span);
        assert_eq!(doc.text(t1), Some("Sa"));
        assert_eq!(doc.text(children[2]), Some("y "));
    }

    #[test]
    fn test_insert_at_text_edges_does_not_split() {
        let (mut doc, p, t1, _, _) = fixture();
        let before = doc.create_element("i");
        let after = doc.create_element("u");

        doc.insert_node(&mut Range::collapsed(BoundaryPoint::new(t1, 0)), before).unwrap();
        doc.insert_node(&mut Range::collapsed(BoundaryPoint::new(t1, 4)), after).unwrap();

        let children = doc.children(p).to_vec();
        assert_eq!(children.len(), 5);
        assert_eq!(children[0], before);
        assert_eq!(children[1], t1);
        assert_eq!(children[2], after);
    }

    #[test]
    fn test_range_text() {
        let (doc, p, t1, bt, t2) = fixture();
        let range = Range::new(BoundaryPoint::new(t1, 2), BoundaryPoint::new(t2, 2));
        assert_eq!(doc.range_text(&range), "y bold e");
        let whole = Range::new(BoundaryPoint::new(p, 0), BoundaryPoint::new(p, 3));
        assert_eq!(doc.range_text(&whole), "Say bold end");
        let inner = Range::new(BoundaryPoint::new(bt, 1), BoundaryPoint::new(bt, 3));
        assert_eq!(doc.range_text(&inner), "ol");
    }
}
