//! Component tree document model
//!
//! Every converted element becomes one [`Node`]. Children never live on the
//! node directly: they sit in a named slot, and a slot-typed prop (usually
//! `children`) points at that slot.

use crate::config::consts::converter::MAX_JSON_NESTING;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Component type labels understood by the editing tool
pub mod component {
    pub const BOX: &str = "box";
    pub const VSTACK: &str = "vstack";
    pub const HSTACK: &str = "hstack";
    pub const TEXT: &str = "text";
    pub const PLAIN_TEXT: &str = "plain-text";
    pub const HEADER: &str = "header";
    pub const LINK: &str = "link";
    pub const LINK_CONTAINER: &str = "link-container";
    pub const BUTTON: &str = "button";
    pub const IMAGE: &str = "image";
    pub const VIDEO: &str = "video";
    pub const SECTION: &str = "section";
    pub const HTML_ELEMENT: &str = "html-element";
    pub const STYLE_SHEET: &str = "style-sheet";

    /// Types whose content is captured verbatim as markup
    pub const RICH_TEXT: &[&str] = &["richTextEditor", "htmlRte"];

    pub fn is_rich_text(kind: &str) -> bool {
        RICH_TEXT.contains(&kind)
    }
}

/// Generates a fresh run-unique identifier
pub fn new_uid() -> String {
    Uuid::new_v4().to_string()
}

/// One node of the component tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: String,
    pub uid: String,
    pub metadata: Metadata,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub props: BTreeMap<String, Prop>,
    #[serde(default)]
    pub slots: BTreeMap<String, Vec<Node>>,
    #[serde(default)]
    pub styles: Styles,
}

impl Node {
    /// Creates an empty node with a fresh uid
    pub fn new(kind: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            kind: kind.into(),
            uid: new_uid(),
            metadata,
            attrs: BTreeMap::new(),
            props: BTreeMap::new(),
            slots: BTreeMap::new(),
            styles: Styles::default(),
        }
    }

    pub fn set_string(&mut self, key: &str, value: impl Into<String>) {
        self.props.insert(key.to_string(), Prop::string(value));
    }

    /// Static string of a string or imageUrl prop
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Prop::as_str)
    }

    /// Convenience accessor for `props.text`
    pub fn text(&self) -> Option<&str> {
        self.prop_str("text")
    }

    /// Nodes stored in the slot referenced by the `children` prop
    pub fn children(&self) -> &[Node] {
        self.props
            .get("children")
            .and_then(Prop::slot_id)
            .and_then(|id| self.slots.get(id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Opens a new empty slot and points the `children` prop at it
    pub fn open_children_slot(&mut self) -> String {
        let slot = new_uid();
        self.props
            .insert("children".to_string(), Prop::slot(slot.clone()));
        self.slots.insert(slot.clone(), Vec::new());
        slot
    }

    /// Stores `children` in exactly one newly allocated slot
    ///
    /// Any slot opened earlier is discarded.
    pub fn attach_children(&mut self, children: Vec<Node>) {
        let slot = new_uid();
        self.props
            .insert("children".to_string(), Prop::slot(slot.clone()));
        self.slots = BTreeMap::from([(slot, children)]);
    }

    /// Drops empty slots and any slot prop left pointing at nothing
    pub fn prune_empty_slots(&mut self) {
        self.slots.retain(|_, nodes| !nodes.is_empty());
        let slots = &self.slots;
        self.props.retain(|_, prop| match prop.slot_id() {
            Some(id) => slots.contains_key(id),
            None => true,
        });
    }

    /// Visits this node and every descendant depth-first, in slot order
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        f(self);
        for nodes in self.slots.values() {
            for node in nodes {
                node.visit(f);
            }
        }
    }
}

/// A named prop value
///
/// Typed props carry a `type` discriminator. The `properties` bag of an
/// html-element is a plain attribute object, and mapping overrides may inject
/// arbitrary JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prop {
    Typed(TypedProp),
    Properties(BTreeMap<String, String>),
    Raw(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TypedProp {
    String {
        #[serde(rename = "staticString")]
        static_string: String,
    },
    ImageUrl {
        #[serde(rename = "staticString")]
        static_string: String,
    },
    Slot {
        slot: String,
    },
    Array {
        #[serde(rename = "staticArray")]
        static_array: Vec<KeyValue>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Value")]
    pub value: String,
}

impl Prop {
    pub fn string(value: impl Into<String>) -> Self {
        Prop::Typed(TypedProp::String {
            static_string: value.into(),
        })
    }

    pub fn image_url(value: impl Into<String>) -> Self {
        Prop::Typed(TypedProp::ImageUrl {
            static_string: value.into(),
        })
    }

    pub fn slot(id: impl Into<String>) -> Self {
        Prop::Typed(TypedProp::Slot { slot: id.into() })
    }

    pub fn array(items: Vec<KeyValue>) -> Self {
        Prop::Typed(TypedProp::Array {
            static_array: items,
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Prop::Typed(TypedProp::String { static_string })
            | Prop::Typed(TypedProp::ImageUrl { static_string }) => Some(static_string),
            _ => None,
        }
    }

    pub fn slot_id(&self) -> Option<&str> {
        match self {
            Prop::Typed(TypedProp::Slot { slot }) => Some(slot),
            _ => None,
        }
    }

    /// Discriminator as written on the wire, if the prop has one
    pub fn type_tag(&self) -> Option<&'static str> {
        match self {
            Prop::Typed(TypedProp::String { .. }) => Some("string"),
            Prop::Typed(TypedProp::ImageUrl { .. }) => Some("imageUrl"),
            Prop::Typed(TypedProp::Slot { .. }) => Some("slot"),
            Prop::Typed(TypedProp::Array { .. }) => Some("array"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: String,
    pub source_info: SourceInfo,
    pub element_path: String,
    pub content_preview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_info: Option<LinkInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_info: Option<MediaInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_mapping: Option<MappingProvenance>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub tag_name: String,
    pub id: Option<String>,
    pub class_name: Option<String>,
    #[serde(default)]
    pub data_attributes: BTreeMap<String, String>,
    pub position: Position,
}

/// Position of an element among its parent's element children
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub index: usize,
    pub parent_type: String,
    pub sibling_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkInfo {
    pub href: String,
    pub target: String,
    pub rel: String,
    pub is_external: bool,
    pub is_internal: bool,
    pub is_email: bool,
    pub is_phone: bool,
    pub text_content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaInfo {
    Image(ImageInfo),
    Video(VideoInfo),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub src: String,
    pub alt: String,
    pub dimensions: Dimensions,
    pub loading: String,
    pub decoding: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub sources: Vec<VideoSource>,
    pub controls: bool,
    pub autoplay: bool,
    pub muted: bool,
    #[serde(rename = "loop")]
    pub looped: bool,
    pub poster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSource {
    pub src: Option<String>,
    #[serde(rename = "type")]
    pub mime: Option<String>,
    pub media: Option<String>,
}

/// Records which mapping entry overrode a node's classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingProvenance {
    pub figma_node_id: String,
    pub code_component_name: Option<String>,
    pub figma_component_key: Option<String>,
    #[serde(default)]
    pub variant_properties: Value,
}

/// Per-breakpoint style maps
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Styles {
    pub default: StyleVariant,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleVariant {
    pub responsive_styles: ResponsiveStyles,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponsiveStyles {
    #[serde(default)]
    pub default: BTreeMap<String, String>,
    #[serde(default)]
    pub tablet: BTreeMap<String, String>,
    #[serde(default)]
    pub mobile: BTreeMap<String, String>,
}

impl Styles {
    /// Styles with `base` under the default breakpoint
    pub fn with_default(base: BTreeMap<String, String>) -> Self {
        Self {
            default: StyleVariant {
                responsive_styles: ResponsiveStyles {
                    default: base,
                    ..Default::default()
                },
            },
        }
    }

    pub fn base(&self) -> &BTreeMap<String, String> {
        &self.default.responsive_styles.default
    }
}

/// The document handed to the editing tool
///
/// A "box" root whose single slot holds the style-sheet node followed by the
/// converted page element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversionResult {
    root: Node,
}

impl ConversionResult {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn into_root(self) -> Node {
        self.root
    }

    /// Reads a serialised document back
    ///
    /// Converted trees nest deeper than serde_json's default recursion
    /// limit allows, so the limit is lifted after a bounded nesting scan.
    ///
    /// # Errors
    ///
    /// Returns error if the JSON nests deeper than `MAX_JSON_NESTING` or is
    /// not a document
    pub fn from_json(json: &str) -> Result<Self> {
        let nesting = json_nesting(json);
        if nesting > MAX_JSON_NESTING {
            return Err(CoreError::DocumentInvalid(format!(
                "nesting depth {} exceeds {}",
                nesting, MAX_JSON_NESTING
            )));
        }
        let mut deserializer = serde_json::Deserializer::from_str(json);
        deserializer.disable_recursion_limit();
        let result = Self::deserialize(&mut deserializer)
            .and_then(|result| deserializer.end().map(|()| result))
            .map_err(|e| CoreError::DocumentInvalid(e.to_string()))?;
        Ok(result)
    }

    /// The style-sheet pseudo-node
    pub fn stylesheet(&self) -> Option<&Node> {
        self.root.children().first()
    }

    /// The converted page element
    pub fn page(&self) -> Option<&Node> {
        self.root.children().get(1)
    }

    /// CSS text carried by the style-sheet node
    pub fn css(&self) -> Option<&str> {
        self.stylesheet().and_then(|node| node.prop_str("styles"))
    }
}

/// Deepest `{`/`[` nesting outside string literals
fn json_nesting(json: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for byte in json.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}
