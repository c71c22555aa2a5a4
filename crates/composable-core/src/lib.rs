// Core modules
pub mod config;
pub mod error;
pub mod mapping;
pub mod node;

// Re-export commonly used types
pub use config::Config;
pub use error::{CoreError, Result};
pub use mapping::{ComponentMapping, MappedNode, MappingMatch, MappingTable};
pub use node::{
    ConversionResult, Dimensions, ImageInfo, KeyValue, LinkInfo, MappingProvenance, MediaInfo,
    Metadata, Node, Position, Prop, ResponsiveStyles, SourceInfo, StyleVariant, Styles, TypedProp,
    VideoInfo, VideoSource, component, new_uid,
};
