//! Text reading helpers
//!
//! Elements carrying a `line-clamp-*` class are visually truncated by the
//! host. Before their text is read the clamp is relaxed through an
//! [`UnclampedGuard`], which puts the original `style` attribute back when
//! it goes out of scope.

use crate::attrs::parse_declarations;
use crate::dom;
use markup5ever_rcdom::Handle;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Classes that clamp an element's visible text
pub const LINE_CLAMP_CLASSES: &[&str] = &["line-clamp-1", "line-clamp-2", "line-clamp-3"];

/// Declarations applied while measuring a clamped element
const RELAXED: &[(&str, &str)] = &[
    ("overflow", "visible"),
    ("text-overflow", "clip"),
    ("white-space", "normal"),
    ("display", "block"),
];

pub fn is_clamped(element: &Handle) -> bool {
    dom::class_list(element)
        .iter()
        .any(|class| LINE_CLAMP_CLASSES.contains(&class.as_str()))
}

/// Scoped style override for text measurement
///
/// Holds the element's original `style` attribute; dropping the guard
/// restores it exactly, or removes the attribute if there was none.
pub struct UnclampedGuard {
    element: Handle,
    original: Option<String>,
}

impl UnclampedGuard {
    /// Applies the relaxed declarations on top of the existing ones
    pub fn apply(element: &Handle) -> Self {
        let original = dom::get_attr(element, "style");

        let mut declarations: Vec<(String, String)> = original
            .as_deref()
            .map(parse_declarations)
            .unwrap_or_default()
            .into_iter()
            .filter(|(property, _)| {
                !RELAXED
                    .iter()
                    .any(|(relaxed, _)| relaxed.eq_ignore_ascii_case(property))
            })
            .collect();
        declarations.extend(
            RELAXED
                .iter()
                .map(|(property, value)| (property.to_string(), value.to_string())),
        );
        let relaxed = declarations
            .iter()
            .map(|(property, value)| format!("{property}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");

        dom::set_attr(element, "style", Some(&relaxed));
        debug!(style = %relaxed, "relaxed line clamp");

        Self {
            element: element.clone(),
            original,
        }
    }
}

impl Drop for UnclampedGuard {
    fn drop(&mut self) {
        dom::set_attr(&self.element, "style", self.original.as_deref());
    }
}

/// Runs `read` with the element's line clamp relaxed
pub fn with_unclamped<T>(element: &Handle, read: impl FnOnce(&Handle) -> T) -> T {
    let _guard = UnclampedGuard::apply(element);
    read(element)
}

/// Trimmed, untruncated text content of an element
pub fn full_text_content(element: &Handle) -> String {
    let read = |el: &Handle| dom::text_content(el).trim().to_string();
    if is_clamped(element) {
        with_unclamped(element, read)
    } else {
        read(element)
    }
}

/// Trims text and strips a trailing ellipsis
///
/// Returns `None` when nothing is left.
pub fn clean_text(raw: &str) -> Option<String> {
    static TRAILING_ELLIPSIS: OnceLock<Regex> = OnceLock::new();
    let re = TRAILING_ELLIPSIS.get_or_init(|| Regex::new(r"(\.{3,}|…)$").expect("static regex"));

    let cleaned = re.replace(raw.trim(), "");
    let cleaned = cleaned.trim_end();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use html5ever::parse_document;
    use html5ever::tendril::TendrilSink;
    use markup5ever_rcdom::RcDom;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    fn parse(html: &str) -> RcDom {
        parse_document(RcDom::default(), Default::default()).one(html)
    }

    fn first_p(dom: &RcDom) -> Handle {
        dom::find_descendant(&dom.document, &|h: &Handle| dom::is_tag(h, "p")).expect("p")
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  Hello  ").as_deref(), Some("Hello"));
        assert_eq!(clean_text("Read more...").as_deref(), Some("Read more"));
        assert_eq!(clean_text("Wait …").as_deref(), Some("Wait"));
        assert_eq!(clean_text("Two.."), Some("Two..".to_string()));
        assert_eq!(clean_text("....."), None);
        assert_eq!(clean_text(" \n "), None);
    }

    #[test]
    fn test_guard_relaxes_and_restores_style() {
        let dom = parse(r#"<p class="line-clamp-2" style="color: red; display: -webkit-box">Long text</p>"#);
        let p = first_p(&dom);

        let during = with_unclamped(&p, |el| dom::get_attr(el, "style"));
        assert_eq!(
            during.as_deref(),
            Some("color: red; overflow: visible; text-overflow: clip; white-space: normal; display: block")
        );
        assert_eq!(
            dom::get_attr(&p, "style").as_deref(),
            Some("color: red; display: -webkit-box")
        );
    }

    #[test]
    fn test_guard_removes_style_it_added() {
        let dom = parse(r#"<p class="line-clamp-1">Text</p>"#);
        let p = first_p(&dom);

        assert_eq!(full_text_content(&p), "Text");
        assert!(!dom::has_attr(&p, "style"));
    }

    #[test]
    fn test_guard_restores_on_panic() {
        let dom = parse(r#"<p class="line-clamp-3" style="overflow: hidden">Text</p>"#);
        let p = first_p(&dom);

        let result = catch_unwind(AssertUnwindSafe(|| {
            with_unclamped(&p, |_| -> String { panic!("measurement failed") })
        }));
        assert!(result.is_err());
        assert_eq!(dom::get_attr(&p, "style").as_deref(), Some("overflow: hidden"));
    }

    #[test]
    fn test_unclamped_element_is_left_alone() {
        let dom = parse(r#"<p style="color: blue"> plain </p>"#);
        let p = first_p(&dom);
        assert!(!is_clamped(&p));
        assert_eq!(full_text_content(&p), "plain");
        assert_eq!(dom::get_attr(&p, "style").as_deref(), Some("color: blue"));
    }
}
