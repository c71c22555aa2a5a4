//! Element tree → component tree conversion
//!
//! Depth-first, left-to-right, one node per element. A failure inside one
//! subtree is logged and that subtree is omitted from its parent; only a
//! failure of the top-level call reaches the caller.

mod augment;
mod children;

use crate::attrs;
use crate::classify::classify;
use crate::dom;
use crate::error::ConvertError;
use crate::media;
use crate::metadata::build_metadata;
use crate::page::Page;
use children::{Parent, choose_strategy};
use composable_core::config::consts::converter::MAX_DEPTH;
use composable_core::{MappingTable, Node, Styles, component};
use markup5ever_rcdom::Handle;
use tracing::warn;

/// Converts elements of one page
pub struct TreeConverter<'a> {
    page: &'a Page,
    mappings: &'a MappingTable,
    max_depth: usize,
}

impl<'a> TreeConverter<'a> {
    pub fn new(page: &'a Page, mappings: &'a MappingTable) -> Self {
        Self {
            page,
            mappings,
            max_depth: MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Converts a subtree; errors are logged and yield `None`
    ///
    /// Non-element nodes and `<br>` also yield `None`.
    pub fn convert(&self, handle: &Handle) -> Option<Node> {
        self.convert_at(handle, 0)
    }

    /// Converts the top-level element
    ///
    /// # Errors
    ///
    /// Returns error if the element fails to convert or produces no node
    pub fn convert_root(&self, root: &Handle) -> Result<Node, ConvertError> {
        self.try_convert(root, 0)?
            .ok_or(ConvertError::RootConversionFailed)
    }

    fn convert_at(&self, handle: &Handle, depth: usize) -> Option<Node> {
        match self.try_convert(handle, depth) {
            Ok(node) => node,
            Err(e) => {
                warn!(
                    path = %crate::metadata::element_path(handle),
                    "dropping subtree: {}", e
                );
                None
            }
        }
    }

    fn try_convert(&self, element: &Handle, depth: usize) -> Result<Option<Node>, ConvertError> {
        let Some(tag) = dom::tag_name(element) else {
            return Ok(None);
        };
        if tag == "br" {
            return Ok(None);
        }
        if depth > self.max_depth {
            return Err(ConvertError::DepthExceeded {
                depth,
                limit: self.max_depth,
            });
        }

        let classification = classify(self.page, element, self.mappings);
        let pairs = attrs::attribute_pairs(element);
        let mut node = Node::new(classification.kind, build_metadata(element));
        node.attrs = pairs.iter().cloned().collect();
        node.styles = seed_styles(element, &pairs);

        if let Some(found) = classification.mapping {
            augment::apply_mapping(&mut node, found)?;
        }

        match node.kind.as_str() {
            component::HTML_ELEMENT => augment::html_element(element, &mut node, &tag, &pairs),
            component::HEADER => augment::header(&mut node, &tag, &pairs),
            _ => {}
        }

        match tag.as_str() {
            "img" => {
                media::augment_image(element, &mut node, self.page.location());
                node.prune_empty_slots();
                return Ok(Some(node));
            }
            "video" => {
                media::augment_video(element, &mut node);
                node.prune_empty_slots();
                return Ok(Some(node));
            }
            "svg" if node.kind == component::IMAGE => {
                media::augment_svg_image(element, &mut node);
                node.prune_empty_slots();
                return Ok(Some(node));
            }
            _ => {}
        }

        if component::is_rich_text(&node.kind) {
            node.set_string("html", dom::inner_html(element)?);
            node.prune_empty_slots();
            return Ok(Some(node));
        }

        let strategy = choose_strategy(element, &tag, &node.kind);
        let results = self.traverse(
            Parent {
                element,
                tag: &tag,
                node: &mut node,
                depth,
            },
            strategy,
        );

        match tag.as_str() {
            "button" => augment::button(element, &mut node),
            "a" => augment::link(element, &mut node),
            _ => {}
        }

        if !results.is_empty() {
            node.attach_children(results);
        }
        node.prune_empty_slots();

        Ok(Some(node))
    }
}

/// Inline declarations plus `className` under the default breakpoint
fn seed_styles(element: &Handle, pairs: &[(String, String)]) -> Styles {
    let mut base = attrs::inline_style(element);
    if let Some((_, class)) = pairs.iter().find(|(name, _)| name == "className")
        && !class.is_empty()
    {
        base.insert("className".to_string(), class.clone());
    }
    Styles::with_default(base)
}
