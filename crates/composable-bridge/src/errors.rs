use composable_html::ConvertError;
use thiserror::Error;

/// Errors surfaced by the messaging bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("CONVERSION_FAILED: {0}")]
    Conversion(#[from] ConvertError),

    #[error("HANDLER_ALREADY_REGISTERED: the dispatcher accepts one handler")]
    AlreadyRegistered,

    #[error("NOTHING_TO_EXPORT: no conversion result in this session")]
    NothingToExport,

    #[error("EXPORT_FAILED: {0}")]
    Export(#[from] std::io::Error),

    #[error("SERIALIZE_FAILED: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
