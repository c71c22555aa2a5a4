//! Node metadata builder

use crate::dom;
use composable_core::config::consts::converter::PREVIEW_CHARS;
use composable_core::{Metadata, Position, SourceInfo};
use markup5ever_rcdom::Handle;
use std::collections::BTreeMap;

/// Builds title, source info, element path and preview for an element
///
/// Attribute and ancestor reads degrade to empty values on failure.
pub fn build_metadata(element: &Handle) -> Metadata {
    let tag_name = dom::tag_name(element).unwrap_or_else(|| "unknown".to_string());
    let id = dom::get_attr(element, "id").filter(|id| !id.is_empty());
    let class_name = dom::get_attr(element, "class").filter(|class| !class.trim().is_empty());
    let preview = content_preview(&dom::text_content(element));

    let mut title = tag_name.clone();
    if let Some(id) = &id {
        title.push('#');
        title.push_str(id);
    } else if let Some(first) = class_name.as_deref().and_then(|c| c.split_whitespace().next()) {
        title.push('.');
        title.push_str(first);
    }
    if !preview.is_empty() {
        let ellipsis = if preview.chars().count() >= PREVIEW_CHARS {
            "..."
        } else {
            ""
        };
        title.push_str(&format!(" - \"{preview}{ellipsis}\""));
    }

    let data_attributes: BTreeMap<String, String> = dom::attributes(element)
        .into_iter()
        .filter(|(name, _)| name.starts_with("data-"))
        .collect();

    Metadata {
        title,
        source_info: SourceInfo {
            tag_name,
            id,
            class_name,
            data_attributes,
            position: position(element),
        },
        element_path: element_path(element),
        content_preview: preview,
        ..Default::default()
    }
}

/// Metadata of a synthesised "plain-text" child
pub fn plain_text_metadata(parent_path: &str, parent_tag: &str, text: &str) -> Metadata {
    Metadata {
        title: format!("text - \"{text}\""),
        source_info: SourceInfo {
            tag_name: "plainText".to_string(),
            id: None,
            class_name: None,
            data_attributes: BTreeMap::new(),
            position: Position {
                index: 0,
                parent_type: parent_tag.to_string(),
                sibling_count: 1,
            },
        },
        element_path: format!("{parent_path} > plain-text"),
        content_preview: text.to_string(),
        ..Default::default()
    }
}

/// First characters of the trimmed text
pub fn content_preview(text: &str) -> String {
    text.trim().chars().take(PREVIEW_CHARS).collect()
}

/// Index among the parent's element children
fn position(element: &Handle) -> Position {
    let Some(parent) = dom::parent_element(element) else {
        return Position::default();
    };
    let siblings = dom::element_children(&parent);
    Position {
        index: siblings
            .iter()
            .position(|sibling| dom::same_node(sibling, element))
            .unwrap_or(0),
        parent_type: dom::tag_name(&parent).unwrap_or_default(),
        sibling_count: siblings.len(),
    }
}

/// Selector-like ancestor chain, e.g. `main#content > ul.list > li:nth-of-type(2)`
///
/// The chain stops below `<body>`.
pub fn element_path(element: &Handle) -> String {
    let mut segments = Vec::new();
    let mut current = Some(element.clone());

    while let Some(node) = current {
        let Some(tag) = dom::tag_name(&node) else {
            break;
        };
        if tag == "body" {
            break;
        }

        let mut segment = tag.clone();
        if let Some(id) = dom::get_attr(&node, "id").filter(|id| !id.is_empty()) {
            segment.push('#');
            segment.push_str(&id);
        } else if let Some(first) = dom::class_list(&node).into_iter().next() {
            segment.push('.');
            segment.push_str(&first);
        }

        let parent = dom::parent_element(&node);
        if let Some(parent) = &parent {
            let same_tag: Vec<Handle> = dom::element_children(parent)
                .into_iter()
                .filter(|sibling| dom::is_tag(sibling, &tag))
                .collect();
            if same_tag.len() > 1
                && let Some(index) = same_tag.iter().position(|s| dom::same_node(s, &node))
            {
                segment.push_str(&format!(":nth-of-type({})", index + 1));
            }
        }

        segments.push(segment);
        current = parent;
    }

    segments.reverse();
    segments.join(" > ")
}
