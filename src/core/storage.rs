//! Structure storage
//!
//! The ledger and the per-structure content are produced outside the graph
//! code. `StructureStorage` is the seam: the navigator asks it for the
//! ledger once per session and for display content on each selection.
//!
//! `JsonStorage` reads the JSON layout used by the `krystal` binary:
//!
//! ```text
//! ledger.json            {"version": "1.0", "definitions": [{"output", "variant", "inputs"}]}
//! <content_dir>/<name>.json
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use krystal_names::StructureName;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{LedgerError, Result, ResultExt};
use crate::core::models::{Definition, StructureContent};
use crate::core::roles::{RoleTable, MAX_INPUTS};

#[cfg(test)]
use mockall::automock;

/// Source of ledger records and display content.
#[cfg_attr(test, automock)]
pub trait StructureStorage {
    /// Ledger records in append order.
    fn load(&self, source: &Path) -> Result<Vec<Definition>>;

    /// Display content for one structure.
    fn load_content(&self, name: &StructureName) -> Result<StructureContent>;
}

/// On-disk ledger document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerFile {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub definitions: Vec<Definition>,
}

fn default_version() -> String {
    "1.0".to_string()
}

/// Check a record before it enters a ledger.
///
/// Too many inputs is an error; an arity that disagrees with the role
/// table is only worth a warning since the builders skip absent slots.
pub fn validate_definition(def: &Definition) -> Result<()> {
    if def.inputs.len() > MAX_INPUTS {
        return Err(LedgerError::invalid_definition(
            def.output.clone(),
            format!("{} inputs, at most {} allowed", def.inputs.len(), MAX_INPUTS),
        ));
    }
    if let Some(arity) = RoleTable::new().declared_arity(def.variant) {
        if arity != def.inputs.len() {
            warn!(
                name = %def.output,
                variant = %def.variant,
                expected = arity,
                found = def.inputs.len(),
                "definition arity does not match its variant"
            );
        }
    }
    Ok(())
}

fn is_plain_file_stem(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
}

/// JSON file storage.
#[derive(Debug, Clone, Default)]
pub struct JsonStorage {
    content_dir: Option<PathBuf>,
}

impl JsonStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read display content from `dir/<name>.json`.
    pub fn with_content_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.content_dir = Some(dir.into());
        self
    }

    /// Content file for `name`. `None` without a content directory, or when
    /// the name would resolve outside it.
    pub fn content_path(&self, name: &StructureName) -> Option<PathBuf> {
        let dir = self.content_dir.as_ref()?;
        if !is_plain_file_stem(name.as_str()) {
            warn!(name = %name, "structure name is not a plain file name");
            return None;
        }
        Some(dir.join(format!("{}.json", name)))
    }
}

impl StructureStorage for JsonStorage {
    fn load(&self, source: &Path) -> Result<Vec<Definition>> {
        if !source.exists() {
            return Err(LedgerError::LedgerNotFound {
                path: source.to_path_buf(),
            });
        }
        let text = fs::read_to_string(source)?;
        let file: LedgerFile = serde_json::from_str(&text)
            .map_err(LedgerError::from)
            .context(format!("parsing ledger {}", source.display()))?;

        for def in &file.definitions {
            validate_definition(def)?;
        }
        debug!(
            path = %source.display(),
            version = %file.version,
            records = file.definitions.len(),
            "loaded ledger"
        );
        Ok(file.definitions)
    }

    fn load_content(&self, name: &StructureName) -> Result<StructureContent> {
        let path = self
            .content_path(name)
            .filter(|p| p.exists())
            .ok_or_else(|| LedgerError::ContentUnavailable { name: name.clone() })?;
        let text = fs::read_to_string(&path)?;
        let mut content: StructureContent = serde_json::from_str(&text)
            .map_err(LedgerError::from)
            .context(format!("parsing content {}", path.display()))?;
        if content.name.as_str().is_empty() {
            content.name = name.clone();
        }
        Ok(content)
    }
}
