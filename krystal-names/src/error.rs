//! Error types for krystal-names

use thiserror::Error;

/// Errors raised while parsing canonical names
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The text does not follow the `<tag>_<domain>[_<shape>]_<serial>` grammar
    #[error("Not a canonical structure name: {0}")]
    NotCanonical(String),

    /// The tag is not one of the known variant tags
    #[error("Unknown variant tag '{tag}' in name '{name}'")]
    UnknownTag { name: String, tag: String },

    /// A numeric field overflowed
    #[error("Numeric field out of range in name '{0}'")]
    OutOfRange(String),
}

/// Result type alias for NameError
pub type Result<T> = std::result::Result<T, NameError>;
