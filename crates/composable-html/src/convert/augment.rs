//! Type-specific augmentation of a node skeleton

use crate::attrs;
use crate::classify::SVG_LEAF_TAGS;
use crate::dom;
use crate::error::ConvertError;
use crate::text::full_text_content;
use composable_core::{LinkInfo, MappingMatch, MappingProvenance, Node, Prop};
use markup5ever_rcdom::Handle;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Merges a mapping entry into the node
///
/// # Errors
///
/// Returns error if `propMappings` is present but not a JSON object
pub fn apply_mapping(node: &mut Node, found: MappingMatch<'_>) -> Result<(), ConvertError> {
    let mapping = found.mapping;
    if let Some(name) = &mapping.code_component_name {
        node.kind = name.clone();
    }

    match &mapping.prop_mappings {
        None => {}
        Some(Value::Object(props)) => {
            for (key, value) in props {
                let prop: Prop = serde_json::from_value(value.clone())
                    .map_err(|e| ConvertError::InvalidMapping(format!("{key}: {e}")))?;
                node.props.insert(key.clone(), prop);
            }
        }
        Some(other) => {
            return Err(ConvertError::InvalidMapping(format!(
                "propMappings for node {} must be an object, got {}",
                found.node.node_id, other
            )));
        }
    }

    node.metadata.component_mapping = Some(MappingProvenance {
        figma_node_id: found.node.node_id.clone(),
        code_component_name: mapping.code_component_name.clone(),
        figma_component_key: mapping.figma_component_key.clone(),
        variant_properties: found
            .node
            .variant_properties
            .clone()
            .unwrap_or_else(|| Value::Object(Default::default())),
    });
    Ok(())
}

/// `Tag`, `properties` and a speculative children slot for "html-element"
pub fn html_element(element: &Handle, node: &mut Node, tag: &str, pairs: &[(String, String)]) {
    node.set_string("Tag", tag);

    let properties = attrs::html_element_properties(pairs);
    if !properties.is_empty() {
        node.props
            .insert("properties".to_string(), Prop::Properties(properties));
    }

    let has_element_children = !dom::element_children(element).is_empty();
    let container = matches!(tag, "svg" | "g") || !SVG_LEAF_TAGS.contains(&tag);
    if has_element_children && container {
        node.open_children_slot();
    }
}

/// `Tag` and array-typed `properties` for headings
pub fn header(node: &mut Node, tag: &str, pairs: &[(String, String)]) {
    node.set_string("Tag", tag);

    let properties = attrs::header_properties(pairs);
    if !properties.is_empty() {
        node.props
            .insert("properties".to_string(), Prop::array(properties));
    }
}

/// `href`/`label`/`target`/`rel` props and link info for anchors
pub fn link(element: &Handle, node: &mut Node) {
    static EXTERNAL: OnceLock<Regex> = OnceLock::new();
    let external = EXTERNAL.get_or_init(|| Regex::new(r"(?i)^https?://").expect("static regex"));

    let href = dom::get_attr(element, "href").unwrap_or_default();
    let target = dom::get_attr(element, "target").unwrap_or_default();
    let rel = dom::get_attr(element, "rel").unwrap_or_default();
    let text = dom::text_content(element).trim().to_string();

    node.set_string("href", href.clone());
    node.set_string("label", text.clone());
    if !target.is_empty() {
        node.set_string("target", target.clone());
    }
    if !rel.is_empty() {
        node.set_string("rel", rel.clone());
    }

    node.metadata.link_info = Some(LinkInfo {
        is_external: external.is_match(&href),
        is_internal: href.starts_with('#'),
        is_email: href.starts_with("mailto:"),
        is_phone: href.starts_with("tel:"),
        target: if target.is_empty() {
            "_self".to_string()
        } else {
            target
        },
        href,
        rel,
        text_content: text,
    });
}

/// `label` prop from the untruncated button text
pub fn button(element: &Handle, node: &mut Node) {
    node.set_string("label", full_text_content(element));
}
