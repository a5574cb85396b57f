//! Family Forests - everything generated from each structure
//!
//! The forward view of the ledger. Every ledger entry becomes a root whose
//! children are the structures generated from it, labelled with the role
//! the parent played (`d: exp_1_2-2_1` = the parent was that expansion's
//! density). Roots are sorted into six category buckets; siblings at every
//! level are kept in the codec's canonical order.
//!
//! Filtering only decides which roots are admitted. The subtree under an
//! admitted root is never pruned, so a structure rejected as a root can
//! still show up as a descendant of another one.

use std::cmp::Ordering;
use std::collections::HashMap;

use krystal_names::{NameCodec, StructureName, Variant};
use serde::Serialize;
use tracing::debug;

use crate::core::error::{LedgerError, Result};
use crate::core::ledger::{Consumers, StructureLedger};
use crate::core::roles::{serialize_role_label, Role, RoleTable};

// =============================================================================
// Categories
// =============================================================================

/// Forest bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForestCategory {
    Constants,
    Lines,
    Expansions,
    Modulations,
    Permutations,
    Paths,
}

impl ForestCategory {
    pub const ALL: [ForestCategory; 6] = [
        ForestCategory::Constants,
        ForestCategory::Lines,
        ForestCategory::Expansions,
        ForestCategory::Modulations,
        ForestCategory::Permutations,
        ForestCategory::Paths,
    ];

    /// Bucket for a variant. Shaped expansions share the expansions bucket.
    pub fn of(variant: Variant) -> Self {
        match variant {
            Variant::Constant => ForestCategory::Constants,
            Variant::Line => ForestCategory::Lines,
            Variant::Expansion | Variant::ShapedExpansion => ForestCategory::Expansions,
            Variant::Modulation => ForestCategory::Modulations,
            Variant::Permutation => ForestCategory::Permutations,
            Variant::Path => ForestCategory::Paths,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ForestCategory::Constants => "Constants",
            ForestCategory::Lines => "Lines",
            ForestCategory::Expansions => "Expansions",
            ForestCategory::Modulations => "Modulations",
            ForestCategory::Permutations => "Permutations",
            ForestCategory::Paths => "Paths",
        }
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Which roots a forest admits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForestFilter {
    /// Admit roots whose domain is at most this
    pub max_domain: Option<u32>,
    /// Admit roots whose shape agrees with this over the shorter length
    pub shape: Option<Vec<u32>>,
}

impl ForestFilter {
    /// An empty shape is treated as no shape filter.
    pub fn new(max_domain: Option<u32>, shape: Option<Vec<u32>>) -> Self {
        Self {
            max_domain,
            shape: shape.filter(|s| !s.is_empty()),
        }
    }

    /// Filter that admits every classifiable root.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_unfiltered(&self) -> bool {
        self.max_domain.is_none() && self.shape.is_none()
    }

    /// Parse shape filter text such as `3.2.1`, `3-2-1` or `3,2,1`.
    /// Blank text means no shape filter.
    pub fn parse_shape(text: &str) -> Result<Option<Vec<u32>>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        text.split(['.', '-', ','])
            .map(|part| {
                part.trim().parse::<u32>().map_err(|_| LedgerError::InvalidShape {
                    text: text.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Whether `name` may be a forest root under this filter.
    pub fn admits(&self, name: &str, codec: &dyn NameCodec) -> bool {
        if let Some(max) = self.max_domain {
            match codec.domain_of(name) {
                Some(domain) if domain <= max => {}
                _ => return false,
            }
        }
        match &self.shape {
            Some(wanted) => shapes_compatible(&codec.shape_of(name), wanted),
            None => true,
        }
    }
}

/// Componentwise equality over the shorter of the two shapes.
pub fn shapes_compatible(a: &[u32], b: &[u32]) -> bool {
    a.iter().zip(b).all(|(x, y)| x == y)
}

// =============================================================================
// FamilyNode / CategoryForest
// =============================================================================

/// A node in a family tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyNode {
    pub name: StructureName,
    /// Role the parent plays in generating this structure; `None` at roots
    #[serde(serialize_with = "serialize_role_label")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FamilyNode>,
}

impl FamilyNode {
    fn root(name: &str) -> Self {
        Self {
            name: StructureName::from(name),
            role: None,
            children: Vec::new(),
        }
    }

    /// Display label: `"<r>: <name>"` with a one-letter role, or the bare name.
    pub fn label(&self) -> String {
        match &self.role {
            Some(role) => format!("{}{}", role.family_prefix(), self.name),
            None => self.name.to_string(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn size(&self) -> usize {
        1 + self.children.iter().map(|c| c.size()).sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(|c| c.depth()).max().unwrap_or(0)
    }

    pub fn child_labels(&self) -> Vec<String> {
        self.children.iter().map(|c| c.label()).collect()
    }
}

/// Insert `node` before the first sibling that sorts after it.
///
/// Siblings that compare equal keep their insertion order.
pub fn insert_sorted(siblings: &mut Vec<FamilyNode>, node: FamilyNode, codec: &dyn NameCodec) {
    let pos = siblings
        .iter()
        .position(|s| codec.compare(s.name.as_str(), node.name.as_str()) == Ordering::Greater)
        .unwrap_or(siblings.len());
    siblings.insert(pos, node);
}

/// Six sorted buckets of family trees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryForest {
    pub constants: Vec<FamilyNode>,
    pub lines: Vec<FamilyNode>,
    pub expansions: Vec<FamilyNode>,
    pub modulations: Vec<FamilyNode>,
    pub permutations: Vec<FamilyNode>,
    pub paths: Vec<FamilyNode>,
}

impl CategoryForest {
    pub fn bucket(&self, category: ForestCategory) -> &[FamilyNode] {
        match category {
            ForestCategory::Constants => &self.constants,
            ForestCategory::Lines => &self.lines,
            ForestCategory::Expansions => &self.expansions,
            ForestCategory::Modulations => &self.modulations,
            ForestCategory::Permutations => &self.permutations,
            ForestCategory::Paths => &self.paths,
        }
    }

    fn bucket_mut(&mut self, category: ForestCategory) -> &mut Vec<FamilyNode> {
        match category {
            ForestCategory::Constants => &mut self.constants,
            ForestCategory::Lines => &mut self.lines,
            ForestCategory::Expansions => &mut self.expansions,
            ForestCategory::Modulations => &mut self.modulations,
            ForestCategory::Permutations => &mut self.permutations,
            ForestCategory::Paths => &mut self.paths,
        }
    }

    /// Buckets in display order.
    pub fn iter(&self) -> impl Iterator<Item = (ForestCategory, &[FamilyNode])> {
        ForestCategory::ALL.into_iter().map(move |c| (c, self.bucket(c)))
    }

    pub fn total_roots(&self) -> usize {
        self.iter().map(|(_, roots)| roots.len()).sum()
    }

    /// Root names across all buckets, in display order.
    pub fn root_names(&self) -> Vec<&str> {
        self.iter()
            .flat_map(|(_, roots)| roots.iter().map(|r| r.name.as_str()))
            .collect()
    }
}

// =============================================================================
// DescendantForestBuilder
// =============================================================================

/// Builds family trees and forests over a ledger.
pub struct DescendantForestBuilder<'a> {
    ledger: &'a StructureLedger,
    codec: &'a dyn NameCodec,
    roles: RoleTable,
    consumers: HashMap<&'a str, Consumers<'a>>,
}

impl<'a> DescendantForestBuilder<'a> {
    pub fn new(ledger: &'a StructureLedger, codec: &'a dyn NameCodec) -> Self {
        Self {
            ledger,
            codec,
            roles: RoleTable::new(),
            consumers: ledger.consumer_index(),
        }
    }

    /// Bucket for a name, or `None` if the codec cannot classify it.
    pub fn classify(&self, name: &str) -> Option<ForestCategory> {
        self.codec.classify(name).map(ForestCategory::of)
    }

    /// Family tree rooted at `name`, unfiltered.
    pub fn build_node(&self, name: &str) -> Result<FamilyNode> {
        self.build_subtree(name, &mut Vec::new(), &mut HashMap::new())
    }

    /// Forest of every admitted ledger entry.
    pub fn build_forest(&self, filter: &ForestFilter) -> Result<CategoryForest> {
        let mut forest = CategoryForest::default();
        // A subtree depends only on its root name, so it is shared across roots
        let mut memo = HashMap::new();
        let mut dropped = 0usize;

        for def in self.ledger.iter() {
            let name = def.output.as_str();
            let Some(category) = self.classify(name) else {
                debug!(name, "unclassifiable ledger entry left out of forest");
                dropped += 1;
                continue;
            };
            if !filter.admits(name, self.codec) {
                continue;
            }
            let root = self.build_subtree(name, &mut Vec::new(), &mut memo)?;
            insert_sorted(forest.bucket_mut(category), root, self.codec);
        }

        debug!(
            roots = forest.total_roots(),
            dropped,
            max_domain = ?filter.max_domain,
            shape = ?filter.shape,
            "built family forest"
        );
        Ok(forest)
    }

    fn build_subtree(
        &self,
        name: &str,
        trail: &mut Vec<StructureName>,
        memo: &mut HashMap<String, FamilyNode>,
    ) -> Result<FamilyNode> {
        if let Some(done) = memo.get(name) {
            return Ok(done.clone());
        }
        if let Some(pos) = trail.iter().position(|n| n == name) {
            let mut path = trail[pos..].to_vec();
            path.push(StructureName::from(name));
            return Err(LedgerError::CycleDetected { path });
        }

        let mut node = FamilyNode::root(name);
        if let Some(consumers) = self.consumers.get(name) {
            trail.push(StructureName::from(name));
            for &(slot, def) in consumers {
                let Some(role) = self.roles.role_at(def.variant, slot) else {
                    continue;
                };
                let mut child = self.build_subtree(def.output.as_str(), trail, memo)?;
                child.role = Some(role);
                insert_sorted(&mut node.children, child, self.codec);
            }
            trail.pop();
        }

        memo.insert(name.to_string(), node.clone());
        Ok(node)
    }
}
