//! composable.toml configuration

pub mod consts;
mod model;

pub use model::{BridgeConfig, Config, ConverterConfig, ExportConfig, RenderWaitConfig};
