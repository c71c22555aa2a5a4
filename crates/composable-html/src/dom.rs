//! Read helpers over the rcdom element tree
//!
//! Attribute access uses `try_borrow`; a busy attribute list reads as empty.

use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::StrTendril;
use markup5ever::{Attribute, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, NodeData, SerializableHandle};
use std::rc::Rc;
use tracing::warn;

/// Lower-cased local name of an element, `None` for other node kinds
pub fn tag_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref().to_ascii_lowercase()),
        _ => None,
    }
}

pub fn is_element(handle: &Handle) -> bool {
    matches!(handle.data, NodeData::Element { .. })
}

pub fn is_tag(handle: &Handle, tag: &str) -> bool {
    tag_name(handle).is_some_and(|name| name == tag)
}

/// Gets attribute value by name
pub fn get_attr(handle: &Handle, name: &str) -> Option<String> {
    let NodeData::Element { attrs, .. } = &handle.data else {
        return None;
    };
    let Ok(attrs) = attrs.try_borrow() else {
        warn!(attribute = name, "attribute read failed: attributes busy");
        return None;
    };
    attrs
        .iter()
        .find(|attr| attr.name.local.as_ref() == name)
        .map(|attr| attr.value.to_string())
}

pub fn has_attr(handle: &Handle, name: &str) -> bool {
    get_attr(handle, name).is_some()
}

/// All attributes as (name, value) pairs in source order
pub fn attributes(handle: &Handle) -> Vec<(String, String)> {
    let NodeData::Element { attrs, .. } = &handle.data else {
        return Vec::new();
    };
    match attrs.try_borrow() {
        Ok(attrs) => attrs
            .iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect(),
        Err(e) => {
            warn!("attribute read failed: {}", e);
            Vec::new()
        }
    }
}

/// Sets (or with `None` removes) an attribute in place
pub fn set_attr(handle: &Handle, name: &str, value: Option<&str>) {
    let NodeData::Element { attrs, .. } = &handle.data else {
        return;
    };
    let Ok(mut attrs) = attrs.try_borrow_mut() else {
        warn!(attribute = name, "attribute write failed: attributes busy");
        return;
    };
    let position = attrs
        .iter()
        .position(|attr| attr.name.local.as_ref() == name);
    match (position, value) {
        (Some(index), Some(value)) => attrs[index].value = StrTendril::from_slice(value),
        (Some(index), None) => {
            attrs.remove(index);
        }
        (None, Some(value)) => attrs.push(Attribute {
            name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
            value: StrTendril::from_slice(value),
        }),
        (None, None) => {}
    }
}

/// Whitespace-separated entries of the `class` attribute
pub fn class_list(handle: &Handle) -> Vec<String> {
    get_attr(handle, "class")
        .map(|class| class.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn has_class(handle: &Handle, class: &str) -> bool {
    class_list(handle).iter().any(|c| c == class)
}

/// Every child node, text and comments included
pub fn child_nodes(handle: &Handle) -> Vec<Handle> {
    handle.children.borrow().clone()
}

/// Element children only
pub fn element_children(handle: &Handle) -> Vec<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .filter(|child| is_element(child))
        .cloned()
        .collect()
}

pub fn parent(handle: &Handle) -> Option<Handle> {
    let weak = handle.parent.take()?;
    let parent = weak.upgrade();
    handle.parent.set(Some(weak));
    parent
}

/// Parent node if it is an element
pub fn parent_element(handle: &Handle) -> Option<Handle> {
    parent(handle).filter(is_element)
}

/// Concatenated text of every descendant text node
pub fn text_content(handle: &Handle) -> String {
    let mut text = String::new();
    collect_text(handle, &mut text);
    text
}

fn collect_text(handle: &Handle, out: &mut String) {
    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { .. } => collect_text(child, out),
            _ => {}
        }
    }
}

/// Text of a text node, `None` for other node kinds
pub fn text_of(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Text { contents } => Some(contents.borrow().to_string()),
        _ => None,
    }
}

/// Depth-first descendants (excluding `handle`) with the given tag
pub fn descendants_by_tag(handle: &Handle, tag: &str) -> Vec<Handle> {
    let mut found = Vec::new();
    collect_by_tag(handle, tag, &mut found);
    found
}

fn collect_by_tag(handle: &Handle, tag: &str, found: &mut Vec<Handle>) {
    for child in handle.children.borrow().iter() {
        if is_tag(child, tag) {
            found.push(child.clone());
        }
        collect_by_tag(child, tag, found);
    }
}

/// First descendant element matching `predicate`, depth-first
pub fn find_descendant(handle: &Handle, predicate: &impl Fn(&Handle) -> bool) -> Option<Handle> {
    for child in handle.children.borrow().iter() {
        if is_element(child) && predicate(child) {
            return Some(child.clone());
        }
        if let Some(found) = find_descendant(child, predicate) {
            return Some(found);
        }
    }
    None
}

pub fn same_node(a: &Handle, b: &Handle) -> bool {
    Rc::ptr_eq(a, b)
}

/// Serialises the children of `handle` (innerHTML)
pub fn inner_html(handle: &Handle) -> std::io::Result<String> {
    serialize_scope(handle, TraversalScope::ChildrenOnly(None))
}

/// Serialises `handle` itself (outerHTML)
pub fn outer_html(handle: &Handle) -> std::io::Result<String> {
    serialize_scope(handle, TraversalScope::IncludeNode)
}

fn serialize_scope(handle: &Handle, traversal_scope: TraversalScope) -> std::io::Result<String> {
    let mut buf = Vec::new();
    let node: SerializableHandle = handle.clone().into();
    serialize(
        &mut buf,
        &node,
        SerializeOpts {
            traversal_scope,
            ..Default::default()
        },
    )?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
