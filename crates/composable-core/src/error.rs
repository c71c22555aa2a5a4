use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },

    // Mapping errors
    #[error("MAPPING_INVALID: {0}")]
    MappingInvalid(String),

    // Document errors
    #[error("DOCUMENT_INVALID: {0}")]
    DocumentInvalid(String),

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),

    // Generic errors
    #[error("{0}")]
    Generic(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Generic(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
