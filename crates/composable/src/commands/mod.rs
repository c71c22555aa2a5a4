//! CLI command implementations

pub mod bridge;
pub mod convert;
pub mod css;
pub mod export;
