//! Child traversal strategies
//!
//! Exactly one strategy runs per element: the text-only `div` shortcut,
//! line-break flattening, or the normal walk. Each returns the converted
//! children in document order; the caller owns slot attachment.

use super::TreeConverter;
use crate::classify::SVG_NO_TEXT_TAGS;
use crate::dom;
use crate::metadata::{build_metadata, plain_text_metadata};
use crate::text::{clean_text, full_text_content, is_clamped, with_unclamped};
use composable_core::{Node, component};
use markup5ever_rcdom::{Handle, NodeData};
use tracing::debug;

/// Element being traversed together with its partially built node
pub(super) struct Parent<'n> {
    pub element: &'n Handle,
    pub tag: &'n str,
    pub node: &'n mut Node,
    pub depth: usize,
}

/// Which traversal applies to an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Strategy {
    TextOnlyDiv,
    LineBreaks,
    Normal,
}

pub(super) fn choose_strategy(element: &Handle, tag: &str, kind: &str) -> Strategy {
    let children = dom::child_nodes(element);
    if tag == "div" && children.is_empty() && !dom::text_content(element).is_empty() {
        return Strategy::TextOnlyDiv;
    }
    let has_line_break = children.iter().any(|child| dom::is_tag(child, "br"));
    if has_line_break && !component::is_rich_text(kind) {
        return Strategy::LineBreaks;
    }
    Strategy::Normal
}

impl TreeConverter<'_> {
    pub(super) fn traverse(&self, parent: Parent<'_>, strategy: Strategy) -> Vec<Node> {
        match strategy {
            Strategy::TextOnlyDiv => text_only_div(parent).into_iter().collect(),
            Strategy::LineBreaks => self.flatten_line_breaks(parent),
            Strategy::Normal => self.walk(parent),
        }
    }

    /// Line breaks are dropped; text between element children is gathered
    /// into one "text" node per run
    fn flatten_line_breaks(&self, parent: Parent<'_>) -> Vec<Node> {
        let mut results = Vec::new();
        let mut run = TextRun::default();
        let drops_text = drops_text(&parent);

        for child in dom::child_nodes(parent.element) {
            match &child.data {
                NodeData::Text { .. } if !drops_text => {
                    if let Some(text) = read_segment(parent.element, &child) {
                        run.push(text);
                    }
                }
                NodeData::Element { .. } => {
                    if dom::is_tag(&child, "br") {
                        continue;
                    }
                    if dom::is_tag(&child, "noscript") {
                        debug!("skipping noscript");
                        continue;
                    }
                    results.extend(run.flush(&parent));
                    results.extend(self.convert_at(&child, parent.depth + 1));
                }
                _ => {}
            }
        }
        results.extend(run.flush(&parent));
        results
    }

    /// Normal walk: text folds into the element, elements recurse
    fn walk(&self, parent: Parent<'_>) -> Vec<Node> {
        let mut results = Vec::new();
        let mut segments: Vec<String> = Vec::new();
        let html_element = parent.node.kind == component::HTML_ELEMENT;
        let drops_text = drops_text(&parent);

        for child in dom::child_nodes(parent.element) {
            match &child.data {
                NodeData::Element { .. } => {
                    if dom::is_tag(&child, "noscript") {
                        debug!("skipping noscript");
                        continue;
                    }
                    results.extend(self.convert_at(&child, parent.depth + 1));
                }
                NodeData::Text { .. } if parent.tag != "a" && !drops_text => {
                    let Some(text) = read_segment(parent.element, &child) else {
                        continue;
                    };
                    if html_element {
                        results.push(plain_text(&parent, text));
                    } else {
                        segments.push(text);
                    }
                }
                _ => {}
            }
        }

        if !segments.is_empty() {
            parent.node.set_string("text", segments.join(" "));
        }
        results
    }
}

/// Text of an "html-element" SVG primitive is not rendered
fn drops_text(parent: &Parent<'_>) -> bool {
    parent.node.kind == component::HTML_ELEMENT && SVG_NO_TEXT_TAGS.contains(&parent.tag)
}

/// Cleaned text of one text node, read with any line clamp relaxed
fn read_segment(element: &Handle, text_node: &Handle) -> Option<String> {
    let raw = if is_clamped(element) {
        with_unclamped(element, |_| dom::text_of(text_node))
    } else {
        dom::text_of(text_node)
    }?;
    clean_text(&raw)
}

/// Single "text" child for a `div` that reports text but has no child nodes
fn text_only_div(parent: Parent<'_>) -> Option<Node> {
    let text = clean_text(&full_text_content(parent.element))?;
    let mut child = Node::new(component::TEXT, build_metadata(parent.element));
    child.styles = parent.node.styles.clone();
    child.set_string("text", text);
    Some(child)
}

fn plain_text(parent: &Parent<'_>, text: String) -> Node {
    let metadata = plain_text_metadata(&parent.node.metadata.element_path, parent.tag, &text);
    let mut node = Node::new(component::PLAIN_TEXT, metadata);
    node.set_string("text", text);
    node
}

/// Text segments waiting to become one "text" node
#[derive(Debug, Default)]
struct TextRun {
    segments: Vec<String>,
}

impl TextRun {
    fn push(&mut self, segment: String) {
        self.segments.push(segment);
    }

    /// Materialises the pending segments, leaving the run empty
    fn flush(&mut self, parent: &Parent<'_>) -> Option<Node> {
        if self.segments.is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.segments).join(" ");
        let mut node = Node::new(component::TEXT, build_metadata(parent.element));
        node.styles = parent.node.styles.clone();
        node.set_string("text", text);
        Some(node)
    }
}
