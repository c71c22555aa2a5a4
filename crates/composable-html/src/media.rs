//! Image and video augmentation, SVG previews

use crate::dom;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use composable_core::{Dimensions, ImageInfo, MediaInfo, Node, Prop, VideoInfo, VideoSource};
use markup5ever_rcdom::Handle;
use tracing::warn;
use url::Url;

/// Adds `src`/`alt` props and image media info
///
/// `src` is resolved against the page location; an unresolvable source
/// leaves the node without media props.
pub fn augment_image(element: &Handle, node: &mut Node, location: &Url) {
    let raw = dom::get_attr(element, "src").unwrap_or_default();
    let src = match location.join(raw.trim()) {
        Ok(url) => url.to_string(),
        Err(e) => {
            warn!(src = %raw, "could not resolve image source: {}", e);
            return;
        }
    };
    let alt = dom::get_attr(element, "alt").unwrap_or_default();

    node.props.insert("src".to_string(), Prop::image_url(src.clone()));
    node.props.insert("alt".to_string(), Prop::string(alt.clone()));
    node.metadata.media_info = Some(MediaInfo::Image(ImageInfo {
        src,
        alt,
        dimensions: Dimensions {
            width: dimension(element, "width"),
            height: dimension(element, "height"),
        },
        loading: keyword(element, "loading", &["eager", "lazy"], "eager"),
        decoding: keyword(element, "decoding", &["sync", "async", "auto"], "auto"),
    }));
}

/// Adds video media info and mirrors the first source into `attrs`
pub fn augment_video(element: &Handle, node: &mut Node) {
    let sources: Vec<VideoSource> = dom::descendants_by_tag(element, "source")
        .iter()
        .map(|source| VideoSource {
            src: dom::get_attr(source, "src"),
            mime: dom::get_attr(source, "type"),
            media: dom::get_attr(source, "media"),
        })
        .collect();

    if let Some(first) = sources.first() {
        if let Some(src) = &first.src {
            node.attrs.insert("src".to_string(), src.clone());
        }
        if let Some(mime) = &first.mime {
            node.attrs.insert("type".to_string(), mime.clone());
        }
    }

    node.metadata.media_info = Some(MediaInfo::Video(VideoInfo {
        sources,
        controls: dom::has_attr(element, "controls"),
        autoplay: dom::has_attr(element, "autoplay"),
        muted: dom::has_attr(element, "muted"),
        looped: dom::has_attr(element, "loop"),
        poster: dom::get_attr(element, "poster"),
    }));
}

/// Image props for an inline `<svg>` mapped to the image component
///
/// The markup itself becomes the `src` as a data URL; nothing is added if
/// it cannot be serialised.
pub fn augment_svg_image(element: &Handle, node: &mut Node) {
    let src = svg_data_url(element);
    if src.is_empty() {
        return;
    }
    let alt = dom::get_attr(element, "aria-label").unwrap_or_default();

    node.props.insert("src".to_string(), Prop::image_url(src.clone()));
    node.props.insert("alt".to_string(), Prop::string(alt.clone()));
    node.metadata.media_info = Some(MediaInfo::Image(ImageInfo {
        src,
        alt,
        dimensions: Dimensions {
            width: dimension(element, "width"),
            height: dimension(element, "height"),
        },
        loading: "eager".to_string(),
        decoding: "auto".to_string(),
    }));
}

/// `data:image/svg+xml;base64,` URL of an element's markup
///
/// Returns an empty string if the element cannot be serialised.
pub fn svg_data_url(element: &Handle) -> String {
    match dom::outer_html(element) {
        Ok(markup) => format!("data:image/svg+xml;base64,{}", STANDARD.encode(markup)),
        Err(e) => {
            warn!("svg serialisation failed: {}", e);
            String::new()
        }
    }
}

fn dimension(element: &Handle, name: &str) -> Option<u32> {
    dom::get_attr(element, name).and_then(|value| value.trim().parse().ok())
}

fn keyword(element: &Handle, name: &str, allowed: &[&str], default: &str) -> String {
    dom::get_attr(element, name)
        .map(|value| value.trim().to_ascii_lowercase())
        .filter(|value| allowed.contains(&value.as_str()))
        .unwrap_or_else(|| default.to_string())
}
