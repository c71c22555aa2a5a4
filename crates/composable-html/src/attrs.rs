//! Attribute and inline-style normalisation
//!
//! Raw attributes go to `attrs` untouched apart from `class` → `className`.
//! Nodes typed "html-element" additionally get a `properties` bag whose keys
//! follow the DOM property spelling the editing tool expects.

use crate::dom;
use composable_core::KeyValue;
use markup5ever_rcdom::Handle;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Attributes whose property name is not a plain camel-casing
const RENAMES: &[(&str, &str)] = &[
    ("stroke-linecap", "strokeLinecap"),
    ("stroke-linejoin", "strokeLinejoin"),
    ("stroke-width", "strokeWidth"),
    ("fill-rule", "fillRule"),
    ("clip-rule", "clipRule"),
    ("for", "htmlFor"),
    ("tabindex", "tabIndex"),
    ("readonly", "readOnly"),
    ("maxlength", "maxLength"),
    ("colspan", "colSpan"),
    ("rowspan", "rowSpan"),
];

/// Attribute pairs in source order, `style` dropped and `class` renamed
pub fn attribute_pairs(element: &Handle) -> Vec<(String, String)> {
    dom::attributes(element)
        .into_iter()
        .filter(|(name, _)| name != "style")
        .map(|(name, value)| {
            let name = if name == "class" {
                "className".to_string()
            } else {
                name
            };
            (name, value)
        })
        .collect()
}

/// Raw attribute map of an element
pub fn attrs(element: &Handle) -> BTreeMap<String, String> {
    attribute_pairs(element).into_iter().collect()
}

/// Splits a declaration list into trimmed `(property, value)` pairs
///
/// Each declaration is split at its first `:`; declarations missing either
/// side are dropped.
pub fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let (property, value) = (property.trim(), value.trim());
            (!property.is_empty() && !value.is_empty())
                .then(|| (property.to_string(), value.to_string()))
        })
        .collect()
}

/// The `style` attribute as a map keyed by camel-cased property names
pub fn inline_style(element: &Handle) -> BTreeMap<String, String> {
    dom::get_attr(element, "style")
        .map(|style| {
            parse_declarations(&style)
                .into_iter()
                .map(|(property, value)| (camel_case(&property), value))
                .collect()
        })
        .unwrap_or_default()
}

/// `stroke-width` → `strokeWidth`
pub fn camel_case(name: &str) -> String {
    static HYPHEN_LOWER: OnceLock<Regex> = OnceLock::new();
    let re = HYPHEN_LOWER.get_or_init(|| Regex::new(r"-([a-z])").expect("static regex"));
    re.replace_all(name, |caps: &regex::Captures<'_>| caps[1].to_ascii_uppercase())
        .into_owned()
}

/// Property key an "html-element" uses for a raw attribute name
pub fn property_key(name: &str) -> String {
    if let Some((_, renamed)) = RENAMES.iter().find(|(raw, _)| *raw == name) {
        return renamed.to_string();
    }
    if name.contains('-') && !name.starts_with("data-") && !name.starts_with("aria-") {
        return camel_case(name);
    }
    name.to_string()
}

/// Re-keyed attribute bag for "html-element" nodes, `className` excluded
pub fn html_element_properties(pairs: &[(String, String)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .filter(|(name, _)| name != "className")
        .map(|(name, value)| (property_key(name), value.clone()))
        .collect()
}

/// Attributes of a heading as `{Key, Value}` entries, `className` excluded
pub fn header_properties(pairs: &[(String, String)]) -> Vec<KeyValue> {
    pairs
        .iter()
        .filter(|(name, _)| name != "className")
        .map(|(name, value)| KeyValue {
            key: name.clone(),
            value: value.clone(),
        })
        .collect()
}
