//! Structure Ledger - append-ordered record of structure definitions
//!
//! The persisted ledger is a flat list that may mention the same output
//! more than once: re-generating a structure appends a fresh record rather
//! than editing the old one. The in-memory ledger collapses those edits as
//! it loads, so the most recently appended record for a name always wins,
//! while iteration keeps the order in which names first appeared.

use std::collections::HashMap;

use krystal_names::StructureName;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::core::error::{LedgerError, Result};
use crate::core::models::Definition;
use crate::core::roles::{RoleTable, MAX_INPUTS};

/// Definitions that read a given name, as `(slot, definition)` pairs.
pub type Consumers<'a> = Vec<(usize, &'a Definition)>;

/// In-memory structure ledger.
#[derive(Debug, Clone, Default)]
pub struct StructureLedger {
    definitions: Vec<Definition>,
    index: HashMap<StructureName, usize>,
    appended: usize,
}

impl StructureLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger by appending records in order.
    pub fn from_definitions(definitions: impl IntoIterator<Item = Definition>) -> Self {
        let mut ledger = Self::new();
        for def in definitions {
            ledger.append(def);
        }
        ledger
    }

    /// Append a record. A record for an existing name replaces it in place
    /// and the replaced definition is returned.
    pub fn append(&mut self, definition: Definition) -> Option<Definition> {
        self.appended += 1;
        match self.index.get(&definition.output) {
            Some(&pos) => Some(std::mem::replace(&mut self.definitions[pos], definition)),
            None => {
                self.index
                    .insert(definition.output.clone(), self.definitions.len());
                self.definitions.push(definition);
                None
            }
        }
    }

    /// Latest definition of `name`, if any.
    pub fn resolve(&self, name: &str) -> Option<&Definition> {
        self.index.get(name).map(|&pos| &self.definitions[pos])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of distinct outputs.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Number of records appended, edits included.
    pub fn appended(&self) -> usize {
        self.appended
    }

    /// Definitions in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = &Definition> {
        self.definitions.iter()
    }

    /// Every definition reading `name` through a declared role, ordered by
    /// slot then ledger order.
    pub fn consumers_of(&self, name: &str) -> Consumers<'_> {
        let mut consumers = Vec::new();
        for slot in 0..MAX_INPUTS {
            for def in &self.definitions {
                if role_input(def, slot).is_some_and(|input| input == name) {
                    consumers.push((slot, def));
                }
            }
        }
        consumers
    }

    /// `consumers_of` for every name at once.
    pub fn consumer_index(&self) -> HashMap<&str, Consumers<'_>> {
        let mut index: HashMap<&str, Consumers<'_>> = HashMap::new();
        for slot in 0..MAX_INPUTS {
            for def in &self.definitions {
                if let Some(input) = role_input(def, slot) {
                    index.entry(input.as_str()).or_default().push((slot, def));
                }
            }
        }
        index
    }

    /// Dependency graph with an edge from each role input to the structure
    /// generated from it. Edge weights are slots.
    pub fn dependency_graph(&self) -> DiGraph<StructureName, usize> {
        let mut graph = DiGraph::new();
        let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();

        for def in &self.definitions {
            let idx = graph.add_node(def.output.clone());
            nodes.insert(def.output.as_str(), idx);
        }
        for def in &self.definitions {
            let target = nodes[def.output.as_str()];
            for slot in 0..MAX_INPUTS {
                let Some(input) = role_input(def, slot) else {
                    continue;
                };
                let source = *nodes
                    .entry(input.as_str())
                    .or_insert_with(|| graph.add_node(input.clone()));
                graph.add_edge(source, target, slot);
            }
        }
        graph
    }

    /// Fail with `CycleDetected` if any structure transitively reads itself.
    pub fn check_acyclic(&self) -> Result<()> {
        let graph = self.dependency_graph();
        for mut component in tarjan_scc(&graph) {
            let looped = component.len() > 1
                || component
                    .first()
                    .is_some_and(|&idx| graph.contains_edge(idx, idx));
            if looped {
                component.sort();
                let mut path: Vec<StructureName> =
                    component.iter().map(|&idx| graph[idx].clone()).collect();
                path.push(graph[component[0]].clone());
                return Err(LedgerError::CycleDetected { path });
            }
        }
        Ok(())
    }
}

/// Input at `slot`, if the variant declares a role there. Inputs beyond
/// the role table are ignored by both views.
fn role_input(def: &Definition, slot: usize) -> Option<&StructureName> {
    RoleTable::new().role_at(def.variant, slot)?;
    def.input(slot)
}
