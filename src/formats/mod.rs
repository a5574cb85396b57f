//! Output formats for provenance trees and family forests
//!
//! All writers stream to any `std::io::Write`.

pub mod outline;

pub use outline::{write_forest, write_json, write_provenance};

/// How trees are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Indented text outline (default)
    #[default]
    Outline,
    /// Pretty-printed JSON
    Json,
}
