//! Loading and writing catalog and condition-tree JSON documents.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::domain::{FieldDef, Node};
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::{InfraError, InfraResult, IoResultExt};

/// Reads and writes the JSON documents a caller persists.
pub struct DocumentStore {
    fs: Arc<dyn FileSystem>,
}

impl DocumentStore {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load a field catalog: a JSON array of field definitions.
    #[instrument(level = "debug", skip(self))]
    pub fn load_catalog(&self, path: &Path) -> InfraResult<Vec<FieldDef>> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read catalog", path)?;
        let fields: Vec<FieldDef> = serde_json::from_str(&content).map_err(|e| InfraError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!(fields = fields.len(), "catalog loaded");
        Ok(fields)
    }

    /// Load a declarative condition tree.
    #[instrument(level = "debug", skip(self))]
    pub fn load_tree(&self, path: &Path) -> InfraResult<Node> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read condition tree", path)?;
        let raw: Value = serde_json::from_str(&content).map_err(|e| InfraError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Node::from_json(&raw)?)
    }

    #[instrument(level = "debug", skip(self, node))]
    pub fn write_tree(&self, path: &Path, node: &Node, pretty: bool) -> InfraResult<()> {
        let json = Self::to_json(node, pretty)?;
        self.fs
            .write(path, &format!("{}\n", json))
            .with_path_context("write condition tree", path)?;
        debug!(bytes = json.len() + 1, "condition tree written");
        Ok(())
    }

    pub fn to_json(node: &Node, pretty: bool) -> InfraResult<String> {
        let result = if pretty {
            serde_json::to_string_pretty(node)
        } else {
            serde_json::to_string(node)
        };
        result.map_err(|e| InfraError::Serialize(e.to_string()))
    }
}
