//! Computed layout resolution
//!
//! Only the two properties classification needs are resolved: `display`
//! and `flex-direction`. Sources, weakest first: utility classes, simple
//! selector rules (`tag`, `.class`, `#id`) from readable style sources,
//! then the inline `style` attribute.

use crate::attrs::parse_declarations;
use crate::dom;
use markup5ever_rcdom::Handle;
use regex::Regex;
use std::sync::OnceLock;

/// Resolved layout of one element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedStyle {
    pub display: String,
    pub flex_direction: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "block".to_string(),
            flex_direction: "row".to_string(),
        }
    }
}

/// Utility classes that set layout on their own
const UTILITY_CLASSES: &[(&str, &str, &str)] = &[
    ("flex", "display", "flex"),
    ("inline-flex", "display", "inline-flex"),
    ("grid", "display", "grid"),
    ("inline-grid", "display", "inline-grid"),
    ("flex-col", "flex-direction", "column"),
    ("flex-column", "flex-direction", "column"),
];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Selector {
    Tag(String),
    Class(String),
    Id(String),
}

impl Selector {
    fn parse(raw: &str) -> Option<Self> {
        static IDENT: OnceLock<Regex> = OnceLock::new();
        let ident = IDENT.get_or_init(|| Regex::new(r"^-?[A-Za-z_][\w-]*$").expect("static regex"));

        let raw = raw.trim();
        let (make, name): (fn(String) -> Self, &str) = match raw.chars().next()? {
            '.' => (Selector::Class, &raw[1..]),
            '#' => (Selector::Id, &raw[1..]),
            _ => (|s: String| Selector::Tag(s.to_ascii_lowercase()), raw),
        };
        ident.is_match(name).then(|| make(name.to_string()))
    }

    fn specificity(&self) -> u8 {
        match self {
            Selector::Tag(_) => 1,
            Selector::Class(_) => 2,
            Selector::Id(_) => 3,
        }
    }

    fn matches(&self, element: &Handle) -> bool {
        match self {
            Selector::Tag(tag) => dom::is_tag(element, tag),
            Selector::Class(class) => dom::has_class(element, class),
            Selector::Id(id) => dom::get_attr(element, "id").is_some_and(|v| &v == id),
        }
    }
}

/// One layout declaration from a simple selector rule
#[derive(Debug, Clone)]
struct LayoutRule {
    selector: Selector,
    property: String,
    value: String,
}

/// Layout declarations collected from the page's readable stylesheets
#[derive(Debug, Clone, Default)]
pub struct LayoutRules {
    rules: Vec<LayoutRule>,
}

impl LayoutRules {
    /// Collects layout declarations from top-level rule texts
    ///
    /// Rules with compound selectors, at-rules and rules without layout
    /// declarations contribute nothing.
    pub fn from_rules<'a>(rule_texts: impl IntoIterator<Item = &'a str>) -> Self {
        static RULE: OnceLock<Regex> = OnceLock::new();
        let rule_re =
            RULE.get_or_init(|| Regex::new(r"^\s*([^{}@]+?)\s*\{([^{}]*)\}\s*$").expect("static regex"));

        let mut rules = Vec::new();
        for text in rule_texts {
            let Some(caps) = rule_re.captures(text) else {
                continue;
            };
            let declarations: Vec<_> = parse_declarations(&caps[2])
                .into_iter()
                .filter(|(property, _)| is_layout_property(property))
                .collect();
            if declarations.is_empty() {
                continue;
            }
            for selector in caps[1].split(',').filter_map(Selector::parse) {
                for (property, value) in &declarations {
                    rules.push(LayoutRule {
                        selector: selector.clone(),
                        property: property.to_ascii_lowercase(),
                        value: value.clone(),
                    });
                }
            }
        }
        Self { rules }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolves the layout of an element
    pub fn resolve(&self, element: &Handle) -> ComputedStyle {
        let mut style = ComputedStyle::default();

        let classes = dom::class_list(element);
        for (class, property, value) in UTILITY_CLASSES {
            if classes.iter().any(|c| c == class) {
                apply(&mut style, property, value);
            }
        }

        // Stable sort keeps sheet order within one specificity
        let mut matched: Vec<&LayoutRule> = self
            .rules
            .iter()
            .filter(|rule| rule.selector.matches(element))
            .collect();
        matched.sort_by_key(|rule| rule.selector.specificity());
        for rule in matched {
            apply(&mut style, &rule.property, &rule.value);
        }

        if let Some(inline) = dom::get_attr(element, "style") {
            for (property, value) in parse_declarations(&inline) {
                apply(&mut style, &property.to_ascii_lowercase(), &value);
            }
        }

        style
    }
}

fn is_layout_property(property: &str) -> bool {
    property.eq_ignore_ascii_case("display") || property.eq_ignore_ascii_case("flex-direction")
}

fn apply(style: &mut ComputedStyle, property: &str, value: &str) {
    let value = value
        .trim_end_matches("!important")
        .trim()
        .to_ascii_lowercase();
    match property {
        "display" => style.display = value,
        "flex-direction" => style.flex_direction = value,
        _ => {}
    }
}
