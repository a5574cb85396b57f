//! Core data structures for the ledger: definitions, display content and
//! the on-disk configuration.

use std::fs;
use std::path::{Path, PathBuf};

use krystal_names::{StructureName, Variant};
use serde::{Deserialize, Serialize};

use crate::core::error::{LedgerError, Result, ResultExt};
use crate::core::family::ForestFilter;

/// One ledger record: `output` was generated as a `variant` from `inputs`.
///
/// Inputs are positional; the input at index `p` fills slot `p` of the
/// variant's role table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub output: StructureName,
    pub variant: Variant,
    #[serde(default)]
    pub inputs: Vec<StructureName>,
}

impl Definition {
    pub fn new<I, S>(output: impl Into<StructureName>, variant: Variant, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StructureName>,
    {
        Self {
            output: output.into(),
            variant,
            inputs: inputs.into_iter().map(Into::into).collect(),
        }
    }

    /// A definition with no inputs (constants and lines).
    pub fn source(output: impl Into<StructureName>, variant: Variant) -> Self {
        Self {
            output: output.into(),
            variant,
            inputs: Vec::new(),
        }
    }

    /// Input name at a slot.
    pub fn input(&self, slot: usize) -> Option<&StructureName> {
        self.inputs.get(slot)
    }
}

/// Display payload for one structure.
///
/// Produced by the storage layer and shown next to the provenance tree;
/// nothing in the graph builders reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureContent {
    #[serde(default)]
    pub name: StructureName,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub strands: Vec<Vec<i64>>,
    #[serde(default)]
    pub min_value: Option<i64>,
    #[serde(default)]
    pub max_value: Option<i64>,
    #[serde(default)]
    pub shape: Vec<u32>,
    /// Report of input values missing from the generated content
    #[serde(default)]
    pub missing: Vec<String>,
}

/// Configuration loaded from .krystal_config.json
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct Config {
    /// Ledger file to browse
    #[serde(default)]
    pub ledger: Option<PathBuf>,
    /// Directory holding per-structure content files
    #[serde(default)]
    pub content_dir: Option<PathBuf>,
    /// Domain filter applied when a session opens
    #[serde(default)]
    pub default_domain: Option<u32>,
    /// Shape filter applied when a session opens
    #[serde(default)]
    pub default_shape: Option<Vec<u32>>,
}

impl Config {
    /// Name of the config file looked up in the working directory.
    pub const FILE_NAME: &'static str = ".krystal_config.json";

    /// Default config location for a directory.
    pub fn default_path(root: &Path) -> PathBuf {
        root.join(Self::FILE_NAME)
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(LedgerError::from)
            .context(format!("reading config {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| LedgerError::invalid_config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Filter the forest starts with.
    pub fn default_filter(&self) -> ForestFilter {
        ForestFilter::new(self.default_domain, self.default_shape.clone())
    }
}
