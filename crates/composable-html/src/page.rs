//! Host page model
//!
//! A parsed document together with its location and style sources. The
//! page owns the [`RcDom`]: handles taken from it stay valid only as long as
//! the page is alive.

use crate::dom;
use crate::error::ConvertError;
use crate::layout::{ComputedStyle, LayoutRules};
use crate::stylesheet::{StyleSource, StylesheetLoader};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, RcDom};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;
use url::Url;

pub struct Page {
    dom: RcDom,
    location: Url,
    style_sources: Vec<StyleSource>,
    layout: LayoutRules,
}

impl Page {
    /// Parses a document served from `location`
    ///
    /// # Arguments
    ///
    /// * `html` - document markup
    /// * `location` - URL the document was served from
    /// * `loader` - source of linked stylesheet text
    ///
    /// # Errors
    ///
    /// Returns error if the markup cannot be read
    pub fn parse(
        html: &str,
        location: Url,
        loader: &dyn StylesheetLoader,
    ) -> Result<Self, ConvertError> {
        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .map_err(|e| ConvertError::ParseError(e.to_string()))?;

        let style_sources = collect_style_sources(&dom.document, &location, loader);
        let layout = LayoutRules::from_rules(
            style_sources
                .iter()
                .filter_map(|source| source.rules().ok())
                .flatten()
                .map(String::as_str),
        );
        debug!(
            sources = style_sources.len(),
            layout_rules = layout.len(),
            "parsed page {}",
            location
        );

        Ok(Self {
            dom,
            location,
            style_sources,
            layout,
        })
    }

    pub fn document(&self) -> &Handle {
        &self.dom.document
    }

    pub fn location(&self) -> &Url {
        &self.location
    }

    /// Serialised origin, e.g. `http://localhost:3000`
    pub fn origin(&self) -> String {
        self.location.origin().ascii_serialization()
    }

    /// Linked and embedded sheets in document order
    pub fn style_sources(&self) -> &[StyleSource] {
        &self.style_sources
    }

    /// Raw text of every `<style>` element in document order
    pub fn inline_style_blocks(&self) -> Vec<String> {
        dom::descendants_by_tag(&self.dom.document, "style")
            .iter()
            .map(dom::text_content)
            .collect()
    }

    /// The `<body>` element
    pub fn body(&self) -> Option<Handle> {
        dom::find_descendant(&self.dom.document, &|h: &Handle| dom::is_tag(h, "body"))
    }

    /// Layout of an element, `None` for non-elements
    pub fn computed_style(&self, element: &Handle) -> Option<ComputedStyle> {
        dom::is_element(element).then(|| self.layout.resolve(element))
    }

    /// Whether the host application has finished rendering
    ///
    /// True when an app root (`#root` or `[data-reactroot]`) holds an
    /// `.app`/`.main-content` container, or when some non-`noscript` body
    /// child has text that is not an "enable JavaScript" notice.
    pub fn has_rendered_content(&self) -> bool {
        let document = &self.dom.document;
        let app_root = dom::find_descendant(document, &|h: &Handle| {
            dom::get_attr(h, "id").is_some_and(|id| id == "root") || dom::has_attr(h, "data-reactroot")
        });
        if let Some(root) = app_root
            && dom::find_descendant(&root, &|h: &Handle| {
                dom::has_class(h, "app") || dom::has_class(h, "main-content")
            })
            .is_some()
        {
            return true;
        }

        static NOTICE: OnceLock<Regex> = OnceLock::new();
        let notice = NOTICE.get_or_init(|| Regex::new(r"(?i)enable JavaScript").expect("static regex"));

        let Some(body) = self.body() else {
            return false;
        };
        dom::element_children(&body).iter().any(|child| {
            if dom::is_tag(child, "noscript") {
                return false;
            }
            let text = dom::text_content(child);
            !text.trim().is_empty() && !notice.is_match(&text)
        })
    }
}

fn collect_style_sources(
    document: &Handle,
    location: &Url,
    loader: &dyn StylesheetLoader,
) -> Vec<StyleSource> {
    let mut sources = Vec::new();
    walk_style_sources(document, location, loader, &mut sources);
    sources
}

fn walk_style_sources(
    handle: &Handle,
    location: &Url,
    loader: &dyn StylesheetLoader,
    sources: &mut Vec<StyleSource>,
) {
    for child in dom::child_nodes(handle) {
        match dom::tag_name(&child).as_deref() {
            Some("style") => sources.push(StyleSource::embedded(&dom::text_content(&child))),
            Some("link") if is_stylesheet_link(&child) => {
                let Some(href) = dom::get_attr(&child, "href") else {
                    continue;
                };
                match location.join(&href) {
                    Ok(url) => {
                        let loaded = loader.load(&url);
                        sources.push(StyleSource::linked(url, loaded));
                    }
                    Err(e) => debug!(href = %href, "ignoring stylesheet link: {}", e),
                }
            }
            _ => walk_style_sources(&child, location, loader, sources),
        }
    }
}

fn is_stylesheet_link(link: &Handle) -> bool {
    dom::get_attr(link, "rel").is_some_and(|rel| {
        rel.split_whitespace()
            .any(|token| token.eq_ignore_ascii_case("stylesheet"))
    })
}

/// Produces page snapshots for conversion
///
/// Each call returns a freshly parsed page reflecting the current state of
/// the host document.
pub trait PageSource {
    fn snapshot(&self) -> Result<Page, ConvertError>;
}

/// Page source over fixed markup
pub struct HtmlSource<L> {
    html: String,
    location: Url,
    loader: L,
}

impl<L: StylesheetLoader> HtmlSource<L> {
    pub fn new(html: impl Into<String>, location: Url, loader: L) -> Self {
        Self {
            html: html.into(),
            location,
            loader,
        }
    }
}

impl<L: StylesheetLoader> PageSource for HtmlSource<L> {
    fn snapshot(&self) -> Result<Page, ConvertError> {
        Page::parse(&self.html, self.location.clone(), &self.loader)
    }
}
