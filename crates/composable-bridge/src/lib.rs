//! Cross-window messaging bridge for page conversion
//!
//! Answers conversion requests from trusted origins with the composable tree
//! of the current page, caching one result per session.
//!
//! # Architecture
//!
//! ```text
//! InboundEvent → Dispatcher → MessagingService ─┬─ validate (origin, shape)
//!                                               ├─ cache hit → Outbox
//!                                               └─ wait → snapshot → convert_page → Outbox
//! ```

// Core modules
pub mod dispatcher;
pub mod errors;
pub mod export;
pub mod protocol;
pub mod service;

// Re-export commonly used types
pub use dispatcher::{Dispatcher, MessageHandler};
pub use errors::{BridgeError, Result};
pub use export::{FALLBACK_ROUTE, export_file_name, export_result, page_route};
pub use protocol::{
    AllowList, ERROR_TYPE, InboundEvent, OutboundMessage, REQUEST_TYPE, RESPONSE_TYPE, Rejection,
    RequestOptions, validate,
};
pub use service::{MessagingService, Outbox, Outcome, ServiceSettings, SessionState};
