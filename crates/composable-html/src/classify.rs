//! Component classification
//!
//! Ordered rules: mapping override, fixed tag table, text-only shape, then
//! computed layout.

use crate::dom;
use crate::page::Page;
use composable_core::component;
use composable_core::mapping::CORRELATION_ATTR;
use composable_core::{MappingMatch, MappingTable};
use markup5ever_rcdom::Handle;

/// SVG tags that never get a children slot of their own
pub const SVG_LEAF_TAGS: &[&str] = &[
    "path", "circle", "rect", "line", "polygon", "polyline", "ellipse", "defs", "clippath", "mask",
    "pattern",
];

/// SVG tags whose text nodes are dropped
pub const SVG_NO_TEXT_TAGS: &[&str] = &[
    "path", "circle", "rect", "line", "polygon", "polyline", "ellipse", "g", "defs", "clippath",
    "mask", "pattern",
];

/// Component type for a lower-cased tag, anchors excluded
pub fn table_lookup(tag: &str) -> Option<&'static str> {
    let kind = match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => component::HEADER,
        "video" => component::VIDEO,
        "section" | "article" => component::SECTION,
        "p" | "span" | "label" => component::TEXT,
        "button" => component::BUTTON,
        "img" => component::IMAGE,
        "select" | "option" | "input" | "textarea" | "form" | "ul" | "ol" | "li" | "table"
        | "tr" | "td" | "th" | "thead" | "tbody" | "tfoot" | "nav" | "header" | "footer"
        | "main" | "aside" | "svg" | "g" | "path" | "circle" | "rect" | "line" | "polygon"
        | "polyline" | "ellipse" | "defs" | "clippath" | "mask" | "pattern" => {
            component::HTML_ELEMENT
        }
        _ => return None,
    };
    Some(kind)
}

/// Outcome of classifying one element
#[derive(Debug, Clone)]
pub struct Classification<'a> {
    pub kind: String,
    /// Mapping entry that overrode the default classification
    pub mapping: Option<MappingMatch<'a>>,
}

/// Classifies an element
///
/// A mapping entry matching the element's correlation identifier wins; an
/// entry without a component name keeps the default type but is still
/// reported so its props and provenance can be merged.
pub fn classify<'a>(page: &Page, element: &Handle, mappings: &'a MappingTable) -> Classification<'a> {
    let mapping = dom::get_attr(element, CORRELATION_ATTR).and_then(|id| mappings.lookup(&id));
    let kind = match mapping
        .as_ref()
        .and_then(|found| found.mapping.code_component_name.clone())
    {
        Some(name) => name,
        None => default_kind(page, element).to_string(),
    };
    Classification { kind, mapping }
}

/// Classification without mapping overrides
pub fn default_kind(page: &Page, element: &Handle) -> &'static str {
    let tag = dom::tag_name(element).unwrap_or_default();
    let has_element_children = !dom::element_children(element).is_empty();

    if tag == "a" {
        return if has_element_children {
            component::LINK_CONTAINER
        } else {
            component::LINK
        };
    }
    if let Some(kind) = table_lookup(&tag) {
        return kind;
    }

    // Text-only elements, `div` included
    if !has_element_children && !dom::text_content(element).trim().is_empty() {
        return component::TEXT;
    }

    match page.computed_style(element) {
        Some(style) if style.display == "flex" => {
            if style.flex_direction == "column" {
                component::VSTACK
            } else {
                component::HSTACK
            }
        }
        _ => component::BOX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylesheet::NoopLoader;
    use url::Url;

    fn page(html: &str) -> Page {
        Page::parse(html, Url::parse("http://localhost/").unwrap(), &NoopLoader).unwrap()
    }

    fn element(page: &Page, id: &str) -> Handle {
        dom::find_descendant(page.document(), &|h: &Handle| {
            dom::get_attr(h, "id").is_some_and(|v| v == id)
        })
        .expect("element")
    }

    #[test]
    fn test_anchor_depends_on_element_children() {
        let page = page(r#"<a id="plain" href="/x">Go</a><a id="card" href="/y"><img src="a.png"></a>"#);
        assert_eq!(default_kind(&page, &element(&page, "plain")), component::LINK);
        assert_eq!(default_kind(&page, &element(&page, "card")), component::LINK_CONTAINER);
    }

    #[test]
    fn test_div_shapes() {
        let page = page(
            r#"<div id="t">Hello</div>
               <div id="col" style="display:flex;flex-direction:column"><p>a</p></div>
               <div id="row" class="flex"><p>a</p></div>
               <div id="grid" class="grid"><p>a</p></div>
               <div id="empty"></div>"#,
        );
        assert_eq!(default_kind(&page, &element(&page, "t")), component::TEXT);
        assert_eq!(default_kind(&page, &element(&page, "col")), component::VSTACK);
        assert_eq!(default_kind(&page, &element(&page, "row")), component::HSTACK);
        assert_eq!(default_kind(&page, &element(&page, "grid")), component::BOX);
        assert_eq!(default_kind(&page, &element(&page, "empty")), component::BOX);
    }

    #[test]
    fn test_table_entries_win_over_shape() {
        let page = page(r#"<nav id="n">Menu</nav><article id="a"><p>x</p></article><svg><clipPath id="c"></clipPath></svg>"#);
        assert_eq!(default_kind(&page, &element(&page, "n")), component::HTML_ELEMENT);
        assert_eq!(default_kind(&page, &element(&page, "a")), component::SECTION);
        assert_eq!(default_kind(&page, &element(&page, "c")), component::HTML_ELEMENT);
    }

    #[test]
    fn test_mapping_override() {
        let page = page(r#"<div id="hero" data-figma-id="1:2"><p>x</p></div><div id="other" data-figma-id="5:5"></div>"#);
        let table = MappingTable::from_json(
            r#"[{"nodeIds": [{"nodeId": "1:2"}], "codeComponentName": "HeroBanner"}]"#,
        )
        .unwrap();

        let hero = classify(&page, &element(&page, "hero"), &table);
        assert_eq!(hero.kind, "HeroBanner");
        assert!(hero.mapping.is_some());

        let other = classify(&page, &element(&page, "other"), &table);
        assert_eq!(other.kind, component::BOX);
        assert!(other.mapping.is_none());
    }
}
