//! Structure variants
//!
//! A variant decides how many named inputs a structure was generated from
//! and what role each input plays. The role tables themselves live with the
//! graph builders; this crate only knows the variants and their name tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of structure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Constant,
    Line,
    Expansion,
    ShapedExpansion,
    Modulation,
    Permutation,
    Path,
}

impl Variant {
    /// All variants in canonical order.
    pub const ALL: [Variant; 7] = [
        Variant::Constant,
        Variant::Line,
        Variant::Expansion,
        Variant::ShapedExpansion,
        Variant::Modulation,
        Variant::Permutation,
        Variant::Path,
    ];

    /// Tag used as the first field of a canonical name.
    pub fn tag(&self) -> &'static str {
        match self {
            Variant::Constant => "const",
            Variant::Line => "line",
            Variant::Expansion => "exp",
            Variant::ShapedExpansion => "sexp",
            Variant::Modulation => "mod",
            Variant::Permutation => "perm",
            Variant::Path => "path",
        }
    }

    /// Parse a canonical name tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.tag() == tag)
    }

    /// Position in the canonical order (constants first, paths last).
    pub fn rank(&self) -> u8 {
        match self {
            Variant::Constant => 0,
            Variant::Line => 1,
            Variant::Expansion => 2,
            Variant::ShapedExpansion => 3,
            Variant::Modulation => 4,
            Variant::Permutation => 5,
            Variant::Path => 6,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Constant => "constant",
            Variant::Line => "line",
            Variant::Expansion => "expansion",
            Variant::ShapedExpansion => "shaped expansion",
            Variant::Modulation => "modulation",
            Variant::Permutation => "permutation",
            Variant::Path => "path",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_roundtrip() {
        for variant in Variant::ALL {
            assert_eq!(Variant::from_tag(variant.tag()), Some(variant));
        }
        assert_eq!(Variant::from_tag("nope"), None);
    }

    #[test]
    fn test_rank_matches_declaration_order() {
        let ranks: Vec<u8> = Variant::ALL.iter().map(|v| v.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Variant::ShapedExpansion).unwrap();
        assert_eq!(json, "\"shaped_expansion\"");
        let back: Variant = serde_json::from_str("\"modulation\"").unwrap();
        assert_eq!(back, Variant::Modulation);
    }
}
