//! Role tables
//!
//! Each derived variant fills a fixed, ordered set of input slots, and each
//! slot has a semantic role. The provenance tree lists inputs in exactly
//! this order; the family forest uses the same table to label the edge from
//! an input to the structure generated from it.
//!
//! | Variant          | Roles (slot)                                         |
//! |------------------|------------------------------------------------------|
//! | Constant, Line   | none                                                 |
//! | Expansion        | density (0), points (1), field (2)                   |
//! | ShapedExpansion  | density (0), points (1), axis (2), contour (3), field (4) |
//! | Modulation       | x (0), y (1), field (2)                              |
//! | Permutation      | source (0), axis (1), contour (2)                    |
//! | Path             | positional: 1 (0) .. 5 (4)                           |

use krystal_names::Variant;
use serde::{Serialize, Serializer};

/// Widest slot table of any variant.
pub const MAX_INPUTS: usize = 5;

/// A labelled input slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Role {
    /// Full role name, used in provenance labels (`density: line_1_1`)
    pub label: &'static str,
    /// One-letter tag, used in family labels (`d: line_1_1`)
    pub abbreviation: char,
    /// Input slot this role reads
    pub slot: usize,
}

impl Role {
    const fn new(label: &'static str, abbreviation: char, slot: usize) -> Self {
        Self {
            label,
            abbreviation,
            slot,
        }
    }

    /// Prefix for provenance tree labels.
    pub fn ancestor_prefix(&self) -> String {
        format!("{}: ", self.label)
    }

    /// Three-character prefix for family forest labels.
    pub fn family_prefix(&self) -> String {
        format!("{}: ", self.abbreviation)
    }
}

const EXPANSION_ROLES: [Role; 3] = [
    Role::new("density", 'd', 0),
    Role::new("points", 'p', 1),
    Role::new("field", 'f', 2),
];

const SHAPED_EXPANSION_ROLES: [Role; 5] = [
    Role::new("density", 'd', 0),
    Role::new("points", 'p', 1),
    Role::new("axis", 'a', 2),
    Role::new("contour", 'c', 3),
    Role::new("field", 'f', 4),
];

const MODULATION_ROLES: [Role; 3] = [
    Role::new("x", 'x', 0),
    Role::new("y", 'y', 1),
    Role::new("field", 'f', 2),
];

const PERMUTATION_ROLES: [Role; 3] = [
    Role::new("source", 's', 0),
    Role::new("axis", 'a', 1),
    Role::new("contour", 'c', 2),
];

// Paths take any number of inputs; their roles are just positions.
const PATH_ROLES: [Role; MAX_INPUTS] = [
    Role::new("1", '1', 0),
    Role::new("2", '2', 1),
    Role::new("3", '3', 2),
    Role::new("4", '4', 3),
    Role::new("5", '5', 4),
];

/// Lookup over the per-variant role tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleTable;

impl RoleTable {
    pub fn new() -> Self {
        Self
    }

    /// Declared roles of a variant, in provenance order.
    pub fn roles(&self, variant: Variant) -> &'static [Role] {
        match variant {
            Variant::Constant | Variant::Line => &[],
            Variant::Expansion => &EXPANSION_ROLES,
            Variant::ShapedExpansion => &SHAPED_EXPANSION_ROLES,
            Variant::Modulation => &MODULATION_ROLES,
            Variant::Permutation => &PERMUTATION_ROLES,
            Variant::Path => &PATH_ROLES,
        }
    }

    /// Role of a given slot, if the variant declares one.
    pub fn role_at(&self, variant: Variant, slot: usize) -> Option<Role> {
        self.roles(variant).iter().find(|r| r.slot == slot).copied()
    }

    /// Fixed arity of a variant; `None` for paths, whose arity is open.
    pub fn declared_arity(&self, variant: Variant) -> Option<usize> {
        match variant {
            Variant::Path => None,
            other => Some(self.roles(other).len()),
        }
    }

    /// Whether `prefix` (without the trailing `": "`) names any role.
    pub fn is_role_prefix(&self, prefix: &str) -> bool {
        let mut chars = prefix.chars();
        let single = match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        };
        Variant::ALL.iter().any(|&variant| {
            self.roles(variant)
                .iter()
                .any(|r| r.label == prefix || Some(r.abbreviation) == single)
        })
    }
}

/// Serialize an optional role as its label (`null` for roots).
pub(crate) fn serialize_role_label<S: Serializer>(
    role: &Option<Role>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match role {
        Some(role) => serializer.serialize_some(role.label),
        None => serializer.serialize_none(),
    }
}

/// Strip a role prefix (`"density: "` or `"d: "`) from a rendered label.
///
/// Labels without a recognised prefix come back unchanged.
pub fn strip_role_prefix(label: &str) -> &str {
    match label.split_once(": ") {
        Some((prefix, rest)) if RoleTable.is_role_prefix(prefix) => rest,
        _ => label,
    }
}
