//! krystal-names: the naming layer for Krystal structures
//!
//! Every structure in a ledger is identified by a canonical name that
//! encodes what kind of structure it is and two filter attributes:
//!
//! - **Variant**: constant, line, expansion, shaped expansion, modulation,
//!   permutation or path
//! - **Domain**: a coarse integer attribute
//! - **Shape**: a finer ordered list of integers
//!
//! The graph builders never parse names themselves. They go through the
//! [`NameCodec`] trait so a host can plug in its own naming scheme;
//! [`CanonicalCodec`] is the built-in one.
//!
//! # Example
//!
//! ```rust
//! use krystal_names::{CanonicalCodec, NameCodec, Variant};
//!
//! let codec = CanonicalCodec::new();
//! assert_eq!(codec.classify("exp_3_2-2_14"), Some(Variant::Expansion));
//! assert_eq!(codec.domain_of("exp_3_2-2_14"), Some(3));
//! assert_eq!(codec.shape_of("exp_3_2-2_14"), vec![2, 2]);
//! ```

pub mod codec;
pub mod error;
pub mod name;
pub mod variant;

pub use codec::{CanonicalCodec, NameCodec};
pub use error::{NameError, Result};
pub use name::{CanonicalName, StructureName};
pub use variant::Variant;
