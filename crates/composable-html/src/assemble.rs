//! Document assembly and the page conversion pipeline

use crate::convert::TreeConverter;
use crate::error::ConvertError;
use crate::page::Page;
use crate::stylesheet::extract_all_css;
use composable_core::config::ConverterConfig;
use composable_core::{
    ConversionResult, MappingTable, Metadata, Node, Position, SourceInfo, component,
};
use std::collections::BTreeMap;
use tracing::{debug, error, info};

/// Style-sheet pseudo-node carrying the extracted CSS
pub fn stylesheet_node(css: String) -> Node {
    let metadata = fixed_metadata(
        "Page Styles",
        component::STYLE_SHEET,
        "page-styles",
        2,
        "style-sheet",
        "CSS styles extracted from page",
    );
    let mut node = Node::new(component::STYLE_SHEET, metadata);
    node.set_string("styles", css);
    node
}

/// Wraps the converted page element and its CSS into the result root
pub fn assemble(page_node: Node, css: String) -> ConversionResult {
    let metadata = fixed_metadata(
        "Page Root with Styles",
        "root",
        "page-root",
        1,
        "root",
        "Root container with StyleSheet",
    );
    let mut root = Node::new(component::BOX, metadata);
    root.attach_children(vec![stylesheet_node(css), page_node]);
    ConversionResult::new(root)
}

/// Converts a whole page
///
/// # Arguments
///
/// * `page` - page snapshot to convert
/// * `mappings` - component mapping overrides
/// * `config` - converter limits
///
/// # Errors
///
/// Returns error if the page has no `<body>` or the body fails to convert
pub fn convert_page(
    page: &Page,
    mappings: &MappingTable,
    config: &ConverterConfig,
) -> Result<ConversionResult, ConvertError> {
    let started = std::time::Instant::now();
    let result = run(page, mappings, config);
    match &result {
        Ok(_) => info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "converted {}",
            page.location()
        ),
        Err(e) => error!("conversion of {} failed: {}", page.location(), e),
    }
    result
}

fn run(
    page: &Page,
    mappings: &MappingTable,
    config: &ConverterConfig,
) -> Result<ConversionResult, ConvertError> {
    let body = page.body().ok_or(ConvertError::MissingRoot)?;

    let css = extract_all_css(page);
    debug!(css_len = css.len(), "extracted css");

    let page_node = TreeConverter::new(page, mappings)
        .with_max_depth(config.max_depth)
        .convert_root(&body)?;

    Ok(assemble(page_node, css))
}

fn fixed_metadata(
    title: &str,
    tag_name: &str,
    id: &str,
    sibling_count: usize,
    element_path: &str,
    preview: &str,
) -> Metadata {
    Metadata {
        title: title.to_string(),
        source_info: SourceInfo {
            tag_name: tag_name.to_string(),
            id: Some(id.to_string()),
            class_name: None,
            data_attributes: BTreeMap::new(),
            position: Position {
                index: 0,
                parent_type: "page".to_string(),
                sibling_count,
            },
        },
        element_path: element_path.to_string(),
        content_preview: preview.to_string(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylesheet::NoopLoader;
    use url::Url;

    #[test]
    fn test_result_has_stylesheet_then_page() {
        let page = Page::parse(
            "<style>p { color: red }</style><p>Hi</p>",
            Url::parse("http://localhost/").unwrap(),
            &NoopLoader,
        )
        .unwrap();
        let result = convert_page(&page, &MappingTable::default(), &ConverterConfig::default())
            .unwrap();

        let root = result.root();
        assert_eq!(root.kind, component::BOX);
        assert_eq!(root.metadata.source_info.id.as_deref(), Some("page-root"));
        assert_eq!(root.slots.len(), 1);
        assert_eq!(root.children().len(), 2);

        let sheet = result.stylesheet().unwrap();
        assert_eq!(sheet.kind, component::STYLE_SHEET);
        assert_eq!(sheet.metadata.element_path, "style-sheet");
        assert_eq!(result.css(), Some("p { color: red }\n\np { color: red }"));

        assert_eq!(result.page().unwrap().metadata.source_info.tag_name, "body");
    }

    #[test]
    fn test_empty_css_still_yields_stylesheet_node() {
        let result = assemble(Node::new(component::BOX, Metadata::default()), String::new());
        assert_eq!(result.css(), Some(""));
    }
}
