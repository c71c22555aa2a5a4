//! Style sources of a page and CSS extraction
//!
//! A page exposes its style sources in document order: linked sheets
//! (`<link rel="stylesheet">`) and embedded `<style>` sheets. Extraction
//! concatenates every readable rule, then the raw text of every inline
//! `<style>` block.

use crate::error::StyleAccessError;
use crate::page::Page;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use url::Url;

/// One entry of the page's stylesheet list
#[derive(Debug, Clone)]
pub struct StyleSource {
    /// `None` for sheets embedded in the document
    pub href: Option<Url>,
    rules: Result<Vec<String>, StyleAccessError>,
}

impl StyleSource {
    /// Sheet built from an inline `<style>` block
    pub fn embedded(css: &str) -> Self {
        Self {
            href: None,
            rules: Ok(split_rules(css)),
        }
    }

    /// Sheet referenced by URL, with whatever the loader returned for it
    pub fn linked(href: Url, loaded: Result<String, StyleAccessError>) -> Self {
        Self {
            href: Some(href),
            rules: loaded.map(|css| split_rules(&css)),
        }
    }

    /// Textual form of each rule, in sheet order
    ///
    /// # Errors
    ///
    /// Returns the access error recorded when the sheet was loaded
    pub fn rules(&self) -> Result<&[String], StyleAccessError> {
        self.rules.as_deref().map_err(Clone::clone)
    }
}

/// Fetches the text of a linked stylesheet
pub trait StylesheetLoader {
    fn load(&self, href: &Url) -> Result<String, StyleAccessError>;
}

/// Loader for pages without access to their linked sheets
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLoader;

impl StylesheetLoader for NoopLoader {
    fn load(&self, href: &Url) -> Result<String, StyleAccessError> {
        Err(StyleAccessError::Unreadable {
            href: href.to_string(),
            reason: "no stylesheet loader configured".to_string(),
        })
    }
}

/// In-memory loader keyed by absolute URL
#[derive(Debug, Clone, Default)]
pub struct MapLoader {
    sheets: HashMap<String, String>,
}

impl MapLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, href: impl Into<String>, css: impl Into<String>) -> Self {
        self.sheets.insert(href.into(), css.into());
        self
    }
}

impl StylesheetLoader for MapLoader {
    fn load(&self, href: &Url) -> Result<String, StyleAccessError> {
        self.sheets
            .get(href.as_str())
            .cloned()
            .ok_or_else(|| StyleAccessError::Unreadable {
                href: href.to_string(),
                reason: "not found".to_string(),
            })
    }
}

/// Serves same-origin sheets from a directory mirroring the site root
#[derive(Debug, Clone)]
pub struct SiteRootLoader {
    root: PathBuf,
}

impl SiteRootLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl StylesheetLoader for SiteRootLoader {
    fn load(&self, href: &Url) -> Result<String, StyleAccessError> {
        let unreadable = |reason: String| StyleAccessError::Unreadable {
            href: href.to_string(),
            reason,
        };
        let relative = Path::new(href.path().trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(unreadable("path escapes site root".to_string()));
        }
        std::fs::read_to_string(self.root.join(relative)).map_err(|e| unreadable(e.to_string()))
    }
}

/// Collects all CSS reachable from the page into one string
///
/// Linked sheets from another origin are skipped. Sheets whose rules cannot
/// be enumerated are skipped with a warning; extraction itself never fails.
pub fn extract_all_css(page: &Page) -> String {
    let origin = page.location().origin();
    let mut pieces: Vec<String> = Vec::new();

    for source in page.style_sources() {
        if let Some(href) = &source.href
            && href.origin() != origin
        {
            debug!(href = %href, "skipping cross-origin stylesheet");
            continue;
        }
        match source.rules() {
            Ok(rules) => pieces.extend(rules.iter().cloned()),
            Err(e) => warn!("could not read stylesheet: {}", e),
        }
    }

    for block in page.inline_style_blocks() {
        if !block.trim().is_empty() {
            pieces.push(block);
        }
    }

    pieces.join("\n\n")
}

/// Splits CSS text into top-level rules
///
/// Blocks (including at-rule blocks with nested rules) end at their
/// matching `}`, statement at-rules end at `;`. Comments between rules are
/// dropped; trailing text without a block is ignored.
pub fn split_rules(css: &str) -> Vec<String> {
    let mut rules = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = css.char_indices().peekable();

    let push = |rules: &mut Vec<String>, text: &str| {
        let text = text.trim();
        if !text.is_empty() {
            rules.push(text.to_string());
        }
    };

    while let Some((i, c)) = chars.next() {
        if let Some(q) = quote {
            if c == '\\' {
                chars.next();
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '/' if chars.peek().is_some_and(|&(_, next)| next == '*') => {
                chars.next();
                let mut prev = '\0';
                for (j, n) in chars.by_ref() {
                    if prev == '*' && n == '/' {
                        if depth == 0 && css[start..i].trim().is_empty() {
                            start = j + 1;
                        }
                        break;
                    }
                    prev = n;
                }
            }
            '{' => depth += 1,
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    push(&mut rules, &css[start..=i]);
                    start = i + 1;
                }
            }
            ';' if depth == 0 => {
                push(&mut rules, &css[start..=i]);
                start = i + 1;
            }
            _ => {}
        }
    }

    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_rules_keeps_blocks_whole() {
        let css = r#"
            /* banner */
            @import url("base.css");
            .a { color: red; }
            @media (max-width: 600px) { .a { color: blue; } }
            .b::after { content: "}"; }
        "#;
        let rules = split_rules(css);
        assert_eq!(
            rules,
            vec![
                r#"@import url("base.css");"#,
                ".a { color: red; }",
                "@media (max-width: 600px) { .a { color: blue; } }",
                r#".b::after { content: "}"; }"#,
            ]
        );
    }

    #[test]
    fn test_split_rules_ignores_unterminated_tail() {
        assert_eq!(split_rules(".a { color: red }  .b { col"), vec![".a { color: red }"]);
    }

    #[test]
    fn test_map_loader_reports_missing_sheet() {
        let loader = MapLoader::new().with_sheet("https://x.test/a.css", ".a{}");
        let found = Url::parse("https://x.test/a.css").unwrap();
        let missing = Url::parse("https://x.test/b.css").unwrap();

        assert_eq!(loader.load(&found).unwrap(), ".a{}");
        assert!(matches!(
            loader.load(&missing),
            Err(StyleAccessError::Unreadable { .. })
        ));
    }

    #[test]
    fn test_site_root_loader_rejects_escape() {
        let loader = SiteRootLoader::new("/srv/site");
        let href = Url::parse("http://localhost/a/%2E%2E/secret.css").unwrap();
        // Url normalises `..` segments away, so the lookup stays inside the root
        assert!(!href.path().contains("/../"));
        assert!(loader.load(&href).is_err());
    }

    #[test]
    fn test_port_prefix_is_another_origin() {
        let html = r#"<html><head>
            <link rel="stylesheet" href="http://localhost:30001/evil.css">
            <link rel="stylesheet" href="/app.css">
        </head><body></body></html>"#;
        let loader = MapLoader::new()
            .with_sheet("http://localhost:30001/evil.css", ".evil { color: red }")
            .with_sheet("http://localhost:3000/app.css", ".app { margin: 0 }");
        let location = Url::parse("http://localhost:3000/").unwrap();
        let page = Page::parse(html, location, &loader).unwrap();

        let css = extract_all_css(&page);
        assert_eq!(css, ".app { margin: 0 }");
    }

    #[test]
    fn test_linked_source_keeps_access_error() {
        let href = Url::parse("https://cdn.test/x.css").unwrap();
        let source = StyleSource::linked(
            href.clone(),
            Err(StyleAccessError::CrossOrigin(href.to_string())),
        );
        assert!(source.rules().is_err());
        assert_eq!(StyleSource::embedded("p{}").rules().unwrap(), ["p{}"]);
    }
}
