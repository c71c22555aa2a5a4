use super::consts;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// composable.toml schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub render_wait: RenderWaitConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    consts::bridge::DEFAULT_ALLOWED_ORIGINS
        .iter()
        .map(|origin| origin.to_string())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderWaitConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for RenderWaitConfig {
    fn default() -> Self {
        Self {
            timeout_ms: consts::render_wait::TIMEOUT_MS,
            interval_ms: consts::render_wait::INTERVAL_MS,
        }
    }
}

impl RenderWaitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn default_timeout_ms() -> u64 {
    consts::render_wait::TIMEOUT_MS
}

fn default_interval_ms() -> u64 {
    consts::render_wait::INTERVAL_MS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            max_depth: consts::converter::MAX_DEPTH,
        }
    }
}

fn default_max_depth() -> usize {
    consts::converter::MAX_DEPTH
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_directory")]
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
        }
    }
}

fn default_export_directory() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    /// composable.toml を読み込む
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CoreError::ConfigParseError(e.to_string()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| CoreError::ConfigParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bridge.allowed_origins.is_empty() {
            return Err(invalid("bridge.allowed_origins", "must list at least one origin"));
        }
        if self.render_wait.interval_ms == 0 {
            return Err(invalid("render_wait.interval_ms", "must be greater than 0"));
        }
        if self.render_wait.interval_ms > self.render_wait.timeout_ms {
            return Err(invalid(
                "render_wait.interval_ms",
                "must not exceed render_wait.timeout_ms",
            ));
        }
        if self.converter.max_depth == 0 {
            return Err(invalid("converter.max_depth", "must be greater than 0"));
        }
        if self.converter.max_depth > consts::converter::MAX_DEPTH {
            return Err(invalid(
                "converter.max_depth",
                &format!("must not exceed {}", consts::converter::MAX_DEPTH),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> CoreError {
    CoreError::ConfigInvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(
            config.bridge.allowed_origins,
            vec!["http://localhost:5174", "http://localhost:5173"]
        );
        assert_eq!(config.render_wait.timeout(), Duration::from_millis(3000));
        assert_eq!(config.converter.max_depth, 128);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [render_wait]
            timeout_ms = 500
            "#,
        )
        .unwrap();
        assert_eq!(config.render_wait.timeout_ms, 500);
        assert_eq!(config.render_wait.interval_ms, 100);
    }

    #[test]
    fn test_empty_origin_list_is_invalid() {
        let err = Config::from_toml(
            r#"
            [bridge]
            allowed_origins = []
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("bridge.allowed_origins"));
    }

    #[test]
    fn test_interval_longer_than_timeout_is_invalid() {
        let err = Config::from_toml(
            r#"
            [render_wait]
            timeout_ms = 50
            interval_ms = 100
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::ConfigInvalidValue { .. }));
    }

    #[test]
    fn test_max_depth_above_stack_budget_is_invalid() {
        let err = Config::from_toml("[converter]\nmax_depth = 4096\n").unwrap_err();
        assert!(err.to_string().contains("converter.max_depth"));
        assert!(Config::from_toml("[converter]\nmax_depth = 128\n").is_ok());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = Config::from_toml("[bridge").unwrap_err();
        assert!(err.to_string().starts_with("CONFIG_PARSE_ERROR"));
    }
}
