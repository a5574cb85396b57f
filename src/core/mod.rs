//! Core module for krystal_observatory
//!
//! This module turns a flat structure ledger into two navigable views.
//!
//! # Architecture
//!
//! - `models`: Core data structures (Definition, StructureContent, Config)
//! - `error`: Error types using thiserror
//! - `roles`: Per-variant input role tables
//! - `ledger`: Append-ordered ledger with last-append-wins resolution
//! - `storage`: StructureStorage trait + JSON implementation
//! - `ancestry`: Provenance trees (what a structure came from)
//! - `family`: Family forests (what came from each structure)
//! - `navigator`: Browse session tying selection and filter together

pub mod models;
pub mod error;
pub mod roles;
pub mod ledger;
pub mod storage;
pub mod ancestry;
pub mod family;
pub mod navigator;

// Re-export commonly used types
pub use models::{Config, Definition, StructureContent};
pub use error::{LedgerError, Result, ResultExt};
pub use roles::{strip_role_prefix, Role, RoleTable, MAX_INPUTS};
pub use ledger::StructureLedger;
pub use storage::{validate_definition, JsonStorage, LedgerFile, StructureStorage};
pub use ancestry::{AncestorTreeBuilder, ProvenanceNode};
pub use family::{
    insert_sorted, shapes_compatible, CategoryForest, DescendantForestBuilder, FamilyNode,
    ForestCategory, ForestFilter,
};
pub use navigator::{NavigationStats, Navigator};
