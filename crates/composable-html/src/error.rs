use thiserror::Error;

/// Errors raised while turning a page into a component tree
#[derive(Debug, Error)]
pub enum ConvertError {
    /// HTML parsing error
    #[error("HTML_PARSE_FAILED: {0}")]
    ParseError(String),

    #[error("PAGE_UNAVAILABLE: {0}")]
    PageUnavailable(String),

    #[error("MISSING_ROOT: no body element found")]
    MissingRoot,

    #[error("ROOT_CONVERSION_FAILED: failed to convert body element")]
    RootConversionFailed,

    #[error("DEPTH_EXCEEDED: element nested {depth} levels deep (limit {limit})")]
    DepthExceeded { depth: usize, limit: usize },

    #[error("MAPPING_INVALID: {0}")]
    InvalidMapping(String),

    #[error("SERIALIZE_FAILED: {0}")]
    Serialize(#[from] std::io::Error),
}

/// Why the rules of a style source could not be enumerated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleAccessError {
    #[error("CROSS_ORIGIN: rules of {0} are not readable from this origin")]
    CrossOrigin(String),

    #[error("UNREADABLE: {href}: {reason}")]
    Unreadable { href: String, reason: String },
}
