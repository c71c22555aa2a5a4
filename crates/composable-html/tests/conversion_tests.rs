//! End-to-end page conversion tests

use composable_core::config::ConverterConfig;
use composable_core::{ConversionResult, MappingTable, MediaInfo, Node, component};
use composable_html::{ConvertError, MapLoader, NoopLoader, Page, convert_page, extract_all_css};
use composable_testkit::fixtures::{
    CATALOG_CSS, CATALOG_PAGE, FRAMESET_PAGE, page_with_body,
};
use composable_testkit::{assert_slot_invariant, collect_uids, location, without_uids};
use std::collections::HashSet;

fn catalog_loader() -> MapLoader {
    MapLoader::new()
        .with_sheet("http://localhost:5173/assets/app.css", CATALOG_CSS)
        .with_sheet(
            "https://fonts.example.net/font.css",
            "@font-face { font-family: Remote; src: url(remote.woff2) }",
        )
}

fn catalog() -> Page {
    Page::parse(CATALOG_PAGE, location("/packages/bali"), &catalog_loader()).unwrap()
}

fn hero_mappings() -> MappingTable {
    MappingTable::from_json(
        r#"[{
            "nodeIds": [{"nodeId": "12:34", "variantProperties": {"size": "large"}}],
            "codeComponentName": "HeroSection",
            "figmaComponentKey": "hero-key"
        }]"#,
    )
    .unwrap()
}

fn convert(page: &Page, mappings: &MappingTable) -> ConversionResult {
    convert_page(page, mappings, &ConverterConfig::default()).unwrap()
}

fn find<'a>(root: &'a Node, pred: impl Fn(&Node) -> bool) -> Option<&'a Node> {
    let mut found = None;
    root.visit(&mut |n| {
        if found.is_none() && pred(n) {
            found = Some(n);
        }
    });
    found
}

fn by_id<'a>(root: &'a Node, id: &str) -> &'a Node {
    find(root, |n| n.metadata.source_info.id.as_deref() == Some(id))
        .unwrap_or_else(|| panic!("no node with id {id}"))
}

fn convert_body(body: &str) -> ConversionResult {
    let page = Page::parse(&page_with_body(body), location("/packages/bali"), &NoopLoader).unwrap();
    convert(&page, &MappingTable::default())
}

#[test]
fn test_text_only_div_becomes_text() {
    let result = convert_body(r#"<div id="hello">Hello</div>"#);
    let node = by_id(result.root(), "hello");

    assert_eq!(node.kind, component::TEXT);
    assert_eq!(node.text(), Some("Hello"));
    assert!(node.slots.is_empty());
}

#[test]
fn test_plain_link() {
    let result = convert_body(r#"<a id="go" href="/x" target="_blank">Click</a>"#);
    let node = by_id(result.root(), "go");

    assert_eq!(node.kind, component::LINK);
    assert_eq!(node.prop_str("href"), Some("/x"));
    assert_eq!(node.prop_str("label"), Some("Click"));
    let info = node.metadata.link_info.as_ref().unwrap();
    assert!(!info.is_external);
    assert!(!info.is_internal);
    assert_eq!(info.target, "_blank");
}

#[test]
fn test_image_source_is_resolved() {
    let result = convert_body(r#"<img id="pic" src="pic.png" alt="A">"#);
    let node = by_id(result.root(), "pic");

    assert_eq!(node.kind, component::IMAGE);
    assert_eq!(node.prop_str("src"), Some("http://localhost:5173/packages/pic.png"));
    assert_eq!(node.prop_str("alt"), Some("A"));
    assert_eq!(node.props["src"].type_tag(), Some("imageUrl"));
}

#[test]
fn test_css_skips_cross_origin_sheets() {
    let css = extract_all_css(&catalog());

    assert!(css.contains("margin: 0"));
    assert!(css.contains(".trip-list"));
    assert!(css.contains(".hero { padding: 24px }"));
    assert!(!css.contains("Remote"));
}

#[test]
fn test_catalog_structure() {
    let page = catalog();
    let result = convert(&page, &hero_mappings());

    assert_eq!(result.root().kind, component::BOX);
    assert_eq!(result.root().children().len(), 2);
    assert_eq!(result.stylesheet().unwrap().kind, component::STYLE_SHEET);
    assert!(result.css().unwrap().contains("margin: 0"));

    let body = result.page().unwrap();
    assert_eq!(body.metadata.source_info.tag_name, "body");

    let heading = find(body, |n| n.kind == component::HEADER).unwrap();
    assert_eq!(heading.prop_str("Tag"), Some("h1"));
    assert_eq!(heading.text(), Some("Trips"));

    let home = find(body, |n| n.prop_str("label") == Some("Home")).unwrap();
    assert_eq!(home.kind, component::LINK);
    assert!(!home.metadata.link_info.as_ref().unwrap().is_external);
    let deals = find(body, |n| n.prop_str("label") == Some("Deals")).unwrap();
    assert!(deals.metadata.link_info.as_ref().unwrap().is_external);
    assert_eq!(deals.prop_str("target"), Some("_blank"));

    let list = find(body, |n| {
        n.metadata.source_info.class_name.as_deref() == Some("trip-list")
    })
    .unwrap();
    assert_eq!(list.kind, component::VSTACK);

    let item = find(body, |n| n.metadata.source_info.tag_name == "li").unwrap();
    assert_eq!(item.kind, component::HTML_ELEMENT);
    assert_eq!(item.children().len(), 1);
    assert_eq!(item.children()[0].kind, component::PLAIN_TEXT);
    assert_eq!(item.children()[0].text(), Some("Flights"));
}

#[test]
fn test_catalog_hero_section() {
    let page = catalog();
    let result = convert(&page, &hero_mappings());

    let hero = find(result.root(), |n| n.kind == "HeroSection").unwrap();
    let provenance = hero.metadata.component_mapping.as_ref().unwrap();
    assert_eq!(provenance.figma_node_id, "12:34");
    assert_eq!(provenance.figma_component_key.as_deref(), Some("hero-key"));
    assert_eq!(provenance.variant_properties["size"], "large");

    let kinds: Vec<&str> = hero.children().iter().map(|n| n.kind.as_str()).collect();
    assert_eq!(kinds, [component::IMAGE, component::TEXT, component::BUTTON]);

    let image = &hero.children()[0];
    assert_eq!(
        image.prop_str("src"),
        Some("http://localhost:5173/packages/images/bali.png")
    );
    match image.metadata.media_info.as_ref().unwrap() {
        MediaInfo::Image(info) => {
            assert_eq!(info.dimensions.width, Some(640));
            assert_eq!(info.dimensions.height, Some(320));
            assert_eq!(info.loading, "eager");
        }
        other => panic!("unexpected media info {other:?}"),
    }

    let paragraph = &hero.children()[1];
    assert_eq!(paragraph.text(), Some("Ten days in"));
    assert_eq!(paragraph.children()[0].text(), Some("Bali"));

    assert_eq!(hero.children()[2].prop_str("label"), Some("Book now"));
}

#[test]
fn test_uids_are_unique() {
    let result = convert(&catalog(), &hero_mappings());
    let uids = collect_uids(result.root());
    let unique: HashSet<&String> = uids.iter().collect();
    assert_eq!(unique.len(), uids.len());
}

#[test]
fn test_every_node_keeps_one_referenced_slot() {
    let result = convert(&catalog(), &hero_mappings());
    assert_slot_invariant(result.root());
}

#[test]
fn test_conversion_is_repeatable_except_uids() {
    let page = catalog();
    let first = convert(&page, &hero_mappings());
    let second = convert(&page, &hero_mappings());

    assert_eq!(without_uids(first.root()), without_uids(second.root()));

    let first_uids: HashSet<String> = collect_uids(first.root()).into_iter().collect();
    assert!(
        collect_uids(second.root())
            .iter()
            .all(|uid| !first_uids.contains(uid))
    );
}

#[test]
fn test_result_survives_json() {
    let result = convert(&catalog(), &hero_mappings());
    let json = serde_json::to_string(&result).unwrap();
    let back = ConversionResult::from_json(&json).unwrap();
    assert_eq!(back, result);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["type"], "box");
    assert_eq!(value["metadata"]["title"], "Page Root with Styles");
}

#[test]
fn test_page_without_body() {
    let page = Page::parse(FRAMESET_PAGE, location("/"), &NoopLoader).unwrap();
    let err = convert_page(&page, &MappingTable::default(), &ConverterConfig::default())
        .unwrap_err();
    assert!(matches!(err, ConvertError::MissingRoot));
}

#[test]
fn test_depth_limit_drops_deep_subtree() {
    let nested = format!("{}<p>deep</p>{}", "<div>".repeat(20), "</div>".repeat(20));
    let page = Page::parse(&page_with_body(&nested), location("/"), &NoopLoader).unwrap();
    let result = convert_page(
        &page,
        &MappingTable::default(),
        &ConverterConfig { max_depth: 8 },
    )
    .unwrap();

    assert!(find(result.root(), |n| n.text() == Some("deep")).is_none());
    assert_slot_invariant(result.root());
}

#[test]
fn test_very_deep_page_converts_at_default_limit() {
    let levels = 500;
    let nested = format!(
        "{}{}",
        "<div><span>a</span>".repeat(levels),
        "</div>".repeat(levels)
    );
    let page = Page::parse(&page_with_body(&nested), location("/"), &NoopLoader).unwrap();
    let result = convert(&page, &MappingTable::default());

    let mut spans = 0;
    result.root().visit(&mut |node| {
        if node.text() == Some("a") {
            spans += 1;
        }
    });
    assert!(spans > 100 && spans < levels);
    assert_slot_invariant(result.root());

    let json = serde_json::to_string(&result).unwrap();
    assert_eq!(ConversionResult::from_json(&json).unwrap(), result);
}
