//! HTML page to composable component tree conversion.
//!
//! This crate turns a parsed HTML page into the component tree consumed by
//! the visual editing tool, together with the page's CSS.
//!
//! # Architecture
//!
//! - [`page`]: parsed document, location and style sources
//! - [`stylesheet`]: CSS extraction and stylesheet loaders
//! - [`classify`]: element → component type
//! - [`attrs`]: attribute and inline-style normalisation
//! - [`convert`]: the recursive tree converter
//! - [`assemble`]: root document assembly and the page pipeline
//! - [`render_wait`]: bounded wait for host content
//!
//! # Conversion Flow
//!
//! ```text
//! convert_page()
//!     ↓
//! 1. Locate <body> (missing body is fatal)
//!     ↓
//! 2. extract_all_css()
//!     → same-origin sheet rules, then inline <style> text
//!     ↓
//! 3. TreeConverter::convert_root(body)
//!     → classify, augment, traverse children, attach one slot
//!     ↓
//! 4. assemble()
//!     → box root [style-sheet node, body node]
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use composable_core::MappingTable;
//! use composable_core::config::ConverterConfig;
//! use composable_html::{NoopLoader, Page, convert_page};
//! use url::Url;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let location = Url::parse("http://localhost:5173/")?;
//! let page = Page::parse("<div>Hello</div>", location, &NoopLoader)?;
//! let result = convert_page(&page, &MappingTable::default(), &ConverterConfig::default())?;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod assemble;
pub mod attrs;
pub mod classify;
pub mod convert;
pub mod dom;
pub mod error;
pub mod layout;
pub mod media;
pub mod metadata;
pub mod page;
pub mod render_wait;
pub mod stylesheet;
pub mod text;

// Re-export commonly used types
pub use assemble::{assemble, convert_page, stylesheet_node};
pub use convert::TreeConverter;
pub use error::{ConvertError, StyleAccessError};
pub use layout::ComputedStyle;
pub use media::svg_data_url;
pub use page::{HtmlSource, Page, PageSource};
pub use render_wait::{RenderWait, WaitOutcome, wait_for_content};
pub use stylesheet::{
    MapLoader, NoopLoader, SiteRootLoader, StyleSource, StylesheetLoader, extract_all_css,
};

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ConvertError>;
