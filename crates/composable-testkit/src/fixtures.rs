//! Sample pages and tree helpers
//!
//! Uids are random, so comparisons between conversions go through
//! [`without_uids`], which renames every uid and slot id by first
//! appearance.

use composable_core::Node;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use url::Url;

/// Origin the sample pages are served from
pub const ORIGIN: &str = "http://localhost:5173";

/// A catalog page with layout, media, links and text
pub const CATALOG_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Catalog</title>
  <link rel="stylesheet" href="/assets/app.css">
  <link rel="stylesheet" href="https://fonts.example.net/font.css">
  <style>.hero { padding: 24px }</style>
</head>
<body>
  <div id="root">
    <div class="app">
      <header class="site-header">
        <h1>Trips</h1>
        <nav class="flex">
          <a href="/">Home</a>
          <a href="https://partner.example.org/deals" target="_blank">Deals</a>
        </nav>
      </header>
      <section class="hero" data-figma-id="12:34">
        <img src="images/bali.png" alt="Bali" width="640" height="320">
        <p>Ten days in <b>Bali</b></p>
        <button class="cta">Book now</button>
      </section>
      <div class="trip-list">
        <ul>
          <li>Flights</li>
          <li>Hotels</li>
        </ul>
      </div>
    </div>
  </div>
</body>
</html>"#;

/// Stylesheet served at `/assets/app.css` for [`CATALOG_PAGE`]
pub const CATALOG_CSS: &str = ".trip-list { display: flex; flex-direction: column }\nbody { margin: 0 }";

/// Page still showing its loading notice
pub const LOADING_PAGE: &str = r#"<html><body>
  <noscript>You need to enable JavaScript to run this app.</noscript>
  <div id="root"></div>
</body></html>"#;

/// Document without a `<body>`
pub const FRAMESET_PAGE: &str = r#"<html><frameset cols="50%,50%"><frame src="a.html"><frame src="b.html"></frameset></html>"#;

/// Wraps `body` markup into a rendered page
pub fn page_with_body(body: &str) -> String {
    format!("<html><head></head><body><div id=\"root\"><div class=\"app\">{body}</div></div></body></html>")
}

/// URL of `path` on [`ORIGIN`]
pub fn location(path: &str) -> Url {
    Url::parse(ORIGIN)
        .and_then(|origin| origin.join(path))
        .expect("fixture location")
}

/// Writes `content` to `dir/name`, returning the path
pub fn write_fixture(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write fixture");
    path
}

/// Serialized tree with uids and slot ids replaced by stable aliases
pub fn without_uids(node: &Node) -> Value {
    let value = serde_json::to_value(node).expect("node serializes");
    let mut aliases = HashMap::new();
    canonicalize(value, &mut aliases)
}

fn canonicalize(value: Value, aliases: &mut HashMap<String, String>) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, value) in map {
                let key = if key_is_slot_id(&key, aliases) {
                    alias(&key, aliases)
                } else {
                    key
                };
                let value = match (key.as_str(), value) {
                    ("uid" | "slot", Value::String(id)) => Value::String(alias(&id, aliases)),
                    (_, value) => canonicalize(value, aliases),
                };
                out.insert(key, value);
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| canonicalize(item, aliases))
                .collect(),
        ),
        other => other,
    }
}

fn key_is_slot_id(key: &str, aliases: &HashMap<String, String>) -> bool {
    aliases.contains_key(key)
}

fn alias(id: &str, aliases: &mut HashMap<String, String>) -> String {
    let next = aliases.len();
    aliases
        .entry(id.to_string())
        .or_insert_with(|| format!("id-{next}"))
        .clone()
}

/// Every uid in the tree, in visit order
pub fn collect_uids(node: &Node) -> Vec<String> {
    let mut uids = Vec::new();
    node.visit(&mut |n| uids.push(n.uid.clone()));
    uids
}

/// Asserts that every node has at most one non-empty slot and that each
/// slot is referenced by a slot prop
pub fn assert_slot_invariant(node: &Node) {
    node.visit(&mut |n| {
        assert!(
            n.slots.len() <= 1,
            "{} node {} has {} slots",
            n.kind,
            n.uid,
            n.slots.len()
        );
        let referenced: HashSet<&str> = n.props.values().filter_map(|p| p.slot_id()).collect();
        for (id, children) in &n.slots {
            assert!(!children.is_empty(), "{} node {} has empty slot", n.kind, n.uid);
            assert!(
                referenced.contains(id.as_str()),
                "{} node {} has unreferenced slot {}",
                n.kind,
                n.uid,
                id
            );
        }
        for id in &referenced {
            assert!(
                n.slots.contains_key(*id),
                "{} node {} points at missing slot {}",
                n.kind,
                n.uid,
                id
            );
        }
    });
}
