//! Provenance Trees - what a structure was generated from
//!
//! Starting at one structure, follow each definition back through its
//! inputs until reaching names the ledger does not define. Children keep
//! the variant's declared role order; they are never sorted.
//!
//! # Example
//!
//! ```rust,ignore
//! let builder = AncestorTreeBuilder::new(&ledger);
//! let tree = builder.build("exp_1_2-2_1")?;
//! // exp_1_2-2_1
//! //   density: line_1_1
//! //   points: const_1_1
//! //   field: const_1_1
//! ```

use krystal_names::StructureName;
use serde::Serialize;
use tracing::debug;

use crate::core::error::{LedgerError, Result};
use crate::core::ledger::StructureLedger;
use crate::core::roles::{serialize_role_label, Role, RoleTable};

// =============================================================================
// ProvenanceNode
// =============================================================================

/// A node in a provenance tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvenanceNode {
    pub name: StructureName,
    /// Role this structure plays for its parent; `None` at the root
    #[serde(serialize_with = "serialize_role_label")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ProvenanceNode>,
}

impl ProvenanceNode {
    fn leaf(name: &str, role: Option<Role>) -> Self {
        Self {
            name: StructureName::from(name),
            role,
            children: Vec::new(),
        }
    }

    /// Display label: `"<role>: <name>"`, or the bare name at the root.
    pub fn label(&self) -> String {
        match &self.role {
            Some(role) => format!("{}{}", role.ancestor_prefix(), self.name),
            None => self.name.to_string(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(|c| c.size()).sum::<usize>()
    }

    /// Number of levels in this subtree (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(|c| c.depth()).max().unwrap_or(0)
    }

    pub fn child_labels(&self) -> Vec<String> {
        self.children.iter().map(|c| c.label()).collect()
    }
}

// =============================================================================
// AncestorTreeBuilder
// =============================================================================

/// Builds provenance trees over a ledger.
#[derive(Debug, Clone, Copy)]
pub struct AncestorTreeBuilder<'a> {
    ledger: &'a StructureLedger,
    roles: RoleTable,
}

impl<'a> AncestorTreeBuilder<'a> {
    pub fn new(ledger: &'a StructureLedger) -> Self {
        Self {
            ledger,
            roles: RoleTable::new(),
        }
    }

    /// Provenance tree rooted at `root`.
    ///
    /// Names the ledger does not define become leaves. A name that reaches
    /// itself through its inputs fails with `CycleDetected`; the same input
    /// reached along two different routes is expanded under both.
    pub fn build(&self, root: &str) -> Result<ProvenanceNode> {
        let mut trail = Vec::new();
        let tree = self.build_node(root, None, &mut trail)?;
        debug!(root, nodes = tree.size(), depth = tree.depth(), "built provenance tree");
        Ok(tree)
    }

    fn build_node(
        &self,
        name: &str,
        role: Option<Role>,
        trail: &mut Vec<StructureName>,
    ) -> Result<ProvenanceNode> {
        if let Some(pos) = trail.iter().position(|n| n == name) {
            let mut path = trail[pos..].to_vec();
            path.push(StructureName::from(name));
            return Err(LedgerError::CycleDetected { path });
        }

        let mut node = ProvenanceNode::leaf(name, role);
        let Some(def) = self.ledger.resolve(name) else {
            return Ok(node);
        };

        trail.push(def.output.clone());
        for role in self.roles.roles(def.variant) {
            if let Some(input) = def.input(role.slot) {
                let child = self.build_node(input.as_str(), Some(*role), trail)?;
                node.children.push(child);
            }
        }
        trail.pop();

        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Definition;
    use krystal_names::Variant;

    fn scenario() -> StructureLedger {
        StructureLedger::from_definitions(vec![
            Definition::source("const_1_1", Variant::Constant),
            Definition::source("line_1_1", Variant::Line),
            Definition::new(
                "exp_1_2-2_1",
                Variant::Expansion,
                ["line_1_1", "const_1_1", "const_1_1"],
            ),
        ])
    }

    #[test]
    fn test_children_follow_role_order() {
        let ledger = scenario();
        let tree = AncestorTreeBuilder::new(&ledger).build("exp_1_2-2_1").unwrap();

        assert_eq!(tree.label(), "exp_1_2-2_1");
        assert_eq!(
            tree.child_labels(),
            vec!["density: line_1_1", "points: const_1_1", "field: const_1_1"]
        );
        assert!(tree.children.iter().all(|c| c.is_leaf()));
    }

    #[test]
    fn test_role_order_is_not_sorted() {
        // Inputs deliberately in reverse canonical order
        let ledger = StructureLedger::from_definitions(vec![Definition::new(
            "perm_1_1_1",
            Variant::Permutation,
            ["path_9_9", "line_1_1", "const_1_1"],
        )]);
        let tree = AncestorTreeBuilder::new(&ledger).build("perm_1_1_1").unwrap();
        assert_eq!(
            tree.child_labels(),
            vec!["source: path_9_9", "axis: line_1_1", "contour: const_1_1"]
        );
    }

    #[test]
    fn test_unresolved_root_is_leaf() {
        let ledger = scenario();
        let tree = AncestorTreeBuilder::new(&ledger).build("nowhere").unwrap();
        assert!(tree.is_leaf());
        assert_eq!(tree.label(), "nowhere");
    }

    #[test]
    fn test_size_and_depth() {
        let mut ledger = scenario();
        ledger.append(Definition::new(
            "mod_1_1",
            Variant::Modulation,
            ["exp_1_2-2_1", "line_1_1", "const_1_1"],
        ));
        let tree = AncestorTreeBuilder::new(&ledger).build("mod_1_1").unwrap();

        // mod + (exp + 3) + line + const
        assert_eq!(tree.size(), 7);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.children[0].size(), 4);
    }

    #[test]
    fn test_missing_slot_is_skipped() {
        let ledger = StructureLedger::from_definitions(vec![Definition::new(
            "exp_1_1",
            Variant::Expansion,
            ["line_1_1"],
        )]);
        let tree = AncestorTreeBuilder::new(&ledger).build("exp_1_1").unwrap();
        assert_eq!(tree.child_labels(), vec!["density: line_1_1"]);
    }

    #[test]
    fn test_path_children_are_positional() {
        let ledger = StructureLedger::from_definitions(vec![Definition::new(
            "path_1_1",
            Variant::Path,
            ["line_1_2", "line_1_1"],
        )]);
        let tree = AncestorTreeBuilder::new(&ledger).build("path_1_1").unwrap();
        assert_eq!(tree.child_labels(), vec!["1: line_1_2", "2: line_1_1"]);
    }

    #[test]
    fn test_cycle_detected() {
        let ledger = StructureLedger::from_definitions(vec![
            Definition::new("mod_1_1", Variant::Modulation, ["mod_1_2", "const_1_1", "const_1_1"]),
            Definition::new("mod_1_2", Variant::Modulation, ["line_1_1", "mod_1_1", "const_1_1"]),
        ]);
        let err = AncestorTreeBuilder::new(&ledger).build("mod_1_1").unwrap_err();
        match err {
            LedgerError::CycleDetected { path } => {
                let names: Vec<&str> = path.iter().map(|n| n.as_str()).collect();
                assert_eq!(names, vec!["mod_1_1", "mod_1_2", "mod_1_1"]);
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_serialize_uses_role_labels() {
        let ledger = scenario();
        let tree = AncestorTreeBuilder::new(&ledger).build("exp_1_2-2_1").unwrap();
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["name"], "exp_1_2-2_1");
        assert!(json["role"].is_null());
        assert_eq!(json["children"][1]["role"], "points");
        assert!(json["children"][1].get("children").is_none());
    }
}
