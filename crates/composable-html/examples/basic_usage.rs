//! Basic usage example for composable-html
//!
//! This example converts a small page and prints the component tree.
//!
//! Run with: cargo run --example basic_usage

use composable_core::config::ConverterConfig;
use composable_core::{MappingTable, Node};
use composable_html::{MapLoader, Page, convert_page, extract_all_css};
use url::Url;

const PAGE: &str = r#"<html>
<head><link rel="stylesheet" href="/site.css"></head>
<body>
  <div class="cards">
    <h2>Weekend trips</h2>
    <a href="/trips/bali">Bali<br>from $499</a>
    <img src="img/bali.jpg" alt="Beach" width="320">
  </div>
</body>
</html>"#;

fn print_tree(node: &Node, depth: usize) {
    let text = node.text().map(|t| format!(" \"{t}\"")).unwrap_or_default();
    println!("{}{}{}", "  ".repeat(depth), node.kind, text);
    for child in node.children() {
        print_tree(child, depth + 1);
    }
}

fn main() -> composable_html::Result<()> {
    println!("=== composable-html Basic Usage Example ===\n");

    // Step 1: Parse the page
    println!("Step 1: Parsing page...");
    let location = Url::parse("http://localhost:5173/trips").map_err(|e| {
        composable_html::ConvertError::PageUnavailable(e.to_string())
    })?;
    let loader = MapLoader::new().with_sheet(
        "http://localhost:5173/site.css",
        ".cards { display: flex; flex-direction: column }",
    );
    let page = Page::parse(PAGE, location, &loader)?;
    println!("✓ {} style sources", page.style_sources().len());

    // Step 2: Collect CSS
    println!("\nStep 2: Extracting CSS...");
    println!("{}", extract_all_css(&page));

    // Step 3: Convert
    println!("\nStep 3: Converting...");
    let result = convert_page(&page, &MappingTable::default(), &ConverterConfig::default())?;
    print_tree(result.root(), 0);

    Ok(())
}
