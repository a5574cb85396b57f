//! krystal_observatory - provenance and family views over a structure ledger
//!
//! A composer's library of generative structures is recorded as a flat,
//! append-only ledger: each record says which structure was generated, as
//! which variant, from which named inputs. This crate turns that ledger
//! into the two views a browser needs:
//!
//! - **Provenance tree**: rooted at one structure, what it was generated
//!   from, children in the variant's fixed role order
//! - **Family forest**: for every structure, everything generated from it,
//!   grouped into six categories, filtered by domain and shape, siblings in
//!   canonical name order
//!
//! # Architecture
//!
//! This crate follows the "Library-First" pattern:
//! - **lib.rs** (this file): Pure logic, no CLI concerns
//! - **bin/krystal.rs**: Thin wrapper that calls the library
//!
//! Name parsing lives in the `krystal-names` crate behind the `NameCodec`
//! trait, so the builders can be driven by any naming scheme.

pub mod core;
pub mod formats;

pub use krystal_names::{CanonicalCodec, CanonicalName, NameCodec, StructureName, Variant};

pub use crate::core::{
    AncestorTreeBuilder, CategoryForest, Config, Definition, DescendantForestBuilder, FamilyNode,
    ForestCategory, ForestFilter, JsonStorage, LedgerError, Navigator, ProvenanceNode, Result,
    StructureContent, StructureLedger, StructureStorage,
};
pub use formats::OutputFormat;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
