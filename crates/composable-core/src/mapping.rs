//! Component mapping table
//!
//! Externally supplied entries correlating design-tool node identifiers with
//! code components. A match overrides the default classification of the
//! element carrying that identifier.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Attribute carrying the design-tool correlation identifier
pub const CORRELATION_ATTR: &str = "data-figma-id";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMapping {
    #[serde(default)]
    pub node_ids: Vec<MappedNode>,
    #[serde(default)]
    pub code_component_name: Option<String>,
    /// Prop overrides; must be a JSON object when present
    #[serde(default)]
    pub prop_mappings: Option<Value>,
    #[serde(default)]
    pub figma_component_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappedNode {
    pub node_id: String,
    #[serde(default)]
    pub variant_properties: Option<Value>,
}

/// A matched entry together with the node id that selected it
#[derive(Debug, Clone, Copy)]
pub struct MappingMatch<'a> {
    pub mapping: &'a ComponentMapping,
    pub node: &'a MappedNode,
}

/// Read-only lookup table over mapping entries
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingTable {
    entries: Vec<ComponentMapping>,
}

impl MappingTable {
    pub fn new(entries: Vec<ComponentMapping>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ComponentMapping] {
        &self.entries
    }

    /// First entry listing `node_id`, in table order
    pub fn lookup(&self, node_id: &str) -> Option<MappingMatch<'_>> {
        self.entries.iter().find_map(|mapping| {
            mapping
                .node_ids
                .iter()
                .find(|node| node.node_id == node_id)
                .map(|node| MappingMatch { mapping, node })
        })
    }

    /// Parses a JSON array of mapping entries
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::MappingInvalid(e.to_string()))
    }

    /// Reads a JSON mapping file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }
}
