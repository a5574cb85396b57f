//! Error types for krystal_observatory
//!
//! This module provides structured error handling using thiserror.
//! Unresolved inputs, unclassifiable names and duplicate definitions are
//! not errors; they shape the trees instead of failing them.

use krystal_names::StructureName;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while loading or navigating a ledger
#[derive(Error, Debug)]
pub enum LedgerError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Ledger file not found
    #[error("Ledger not found: {path}")]
    LedgerNotFound { path: PathBuf },

    /// A structure reaches itself through its inputs
    #[error("Cycle detected: {}", format_cycle(.path))]
    CycleDetected { path: Vec<StructureName> },

    /// A ledger record that cannot be turned into a definition
    #[error("Invalid definition '{name}': {message}")]
    InvalidDefinition { name: StructureName, message: String },

    /// Display content could not be produced for a structure
    #[error("Content unavailable for '{name}'")]
    ContentUnavailable { name: StructureName },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Shape filter text that is not a dotted integer list
    #[error("Invalid shape filter: {text}")]
    InvalidShape { text: String },

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<LedgerError>,
    },
}

fn format_cycle(path: &[StructureName]) -> String {
    path.iter()
        .map(|n| n.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl LedgerError {
    /// Wrap an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        LedgerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        LedgerError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid definition error
    pub fn invalid_definition(name: impl Into<StructureName>, message: impl Into<String>) -> Self {
        LedgerError::InvalidDefinition {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Whether this error (or the error it wraps) is a cycle
    pub fn is_cycle(&self) -> bool {
        match self {
            LedgerError::CycleDetected { .. } => true,
            LedgerError::WithContext { source, .. } => source.is_cycle(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(ctx))
    }
}
