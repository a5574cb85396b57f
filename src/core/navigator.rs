//! Ledger Navigation
//!
//! A `Navigator` is one browse session over a ledger. The ledger is loaded
//! once and never changes afterwards; the provenance tree follows the
//! current selection and the family forest follows the current filter.
//! Both views are rebuilt from scratch on every change.
//!
//! # Example
//!
//! ```rust,ignore
//! use krystal_observatory::core::{ForestFilter, JsonStorage, Navigator};
//! use krystal_names::CanonicalCodec;
//!
//! let mut nav = Navigator::open(
//!     Box::new(JsonStorage::new()),
//!     Path::new("ledger.json"),
//!     Box::new(CanonicalCodec::new()),
//!     ForestFilter::none(),
//! )?;
//! nav.select("exp_3_2-2_14")?;
//! nav.set_filter(Some(3), None)?;
//! ```

use std::path::Path;

use krystal_names::{NameCodec, StructureName};
use tracing::{info, warn};

use crate::core::ancestry::{AncestorTreeBuilder, ProvenanceNode};
use crate::core::error::{Result, ResultExt};
use crate::core::family::{CategoryForest, DescendantForestBuilder, ForestFilter};
use crate::core::ledger::StructureLedger;
use crate::core::models::StructureContent;
use crate::core::roles::strip_role_prefix;
use crate::core::storage::StructureStorage;

/// Statistics about a navigation session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationStats {
    pub selections: usize,
    pub filter_changes: usize,
    /// Selections whose display content could not be loaded
    pub missing_content: usize,
    /// Selections of names the ledger does not define
    pub undefined_selections: usize,
}

/// Browse session over one ledger.
pub struct Navigator {
    storage: Box<dyn StructureStorage>,
    codec: Box<dyn NameCodec>,
    ledger: StructureLedger,
    filter: ForestFilter,
    selection: Option<StructureName>,
    ancestry: Option<ProvenanceNode>,
    content: Option<StructureContent>,
    forest: CategoryForest,
    stats: NavigationStats,
}

impl Navigator {
    /// Load the ledger from `source` and build the initial forest.
    pub fn open(
        storage: Box<dyn StructureStorage>,
        source: &Path,
        codec: Box<dyn NameCodec>,
        filter: ForestFilter,
    ) -> Result<Self> {
        let records = storage
            .load(source)
            .context(format!("loading ledger {}", source.display()))?;
        let ledger = StructureLedger::from_definitions(records);
        info!(
            records = ledger.appended(),
            structures = ledger.len(),
            "ledger loaded"
        );
        Self::with_ledger(storage, ledger, codec, filter)
    }

    /// Start a session over an already loaded ledger.
    ///
    /// Fails with `CycleDetected` if the ledger is not acyclic.
    pub fn with_ledger(
        storage: Box<dyn StructureStorage>,
        ledger: StructureLedger,
        codec: Box<dyn NameCodec>,
        filter: ForestFilter,
    ) -> Result<Self> {
        ledger.check_acyclic()?;
        let forest = DescendantForestBuilder::new(&ledger, codec.as_ref()).build_forest(&filter)?;

        Ok(Self {
            storage,
            codec,
            ledger,
            filter,
            selection: None,
            ancestry: None,
            content: None,
            forest,
            stats: NavigationStats::default(),
        })
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Select a structure: rebuild its provenance tree and fetch its content.
    ///
    /// Missing content is logged and leaves `content()` empty; the
    /// selection itself still succeeds.
    pub fn select(&mut self, name: &str) -> Result<&ProvenanceNode> {
        let tree = AncestorTreeBuilder::new(&self.ledger)
            .build(name)
            .context(format!("selecting {}", name))?;
        let name = StructureName::from(name);

        self.content = match self.storage.load_content(&name) {
            Ok(content) => Some(content),
            Err(e) => {
                warn!(name = %name, error = %e, "no display content");
                self.stats.missing_content += 1;
                None
            }
        };
        let defined = self.ledger.contains(name.as_str());
        if !defined {
            self.stats.undefined_selections += 1;
        }
        info!(name = %name, defined, nodes = tree.size(), "selected structure");
        self.selection = Some(name);
        self.stats.selections += 1;

        Ok(self.ancestry.insert(tree))
    }

    /// Select by a rendered tree label, with or without a role prefix.
    pub fn select_label(&mut self, label: &str) -> Result<&ProvenanceNode> {
        self.select(strip_role_prefix(label))
    }

    /// Replace the forest filter and rebuild the forest.
    pub fn set_filter(
        &mut self,
        max_domain: Option<u32>,
        shape: Option<Vec<u32>>,
    ) -> Result<&CategoryForest> {
        let filter = ForestFilter::new(max_domain, shape);
        let forest = DescendantForestBuilder::new(&self.ledger, self.codec.as_ref())
            .build_forest(&filter)?;
        info!(
            max_domain = ?filter.max_domain,
            shape = ?filter.shape,
            roots = forest.total_roots(),
            "filter changed"
        );

        self.filter = filter;
        self.forest = forest;
        self.stats.filter_changes += 1;
        Ok(&self.forest)
    }

    // =========================================================================
    // State
    // =========================================================================

    pub fn selection(&self) -> Option<&StructureName> {
        self.selection.as_ref()
    }

    pub fn ancestry(&self) -> Option<&ProvenanceNode> {
        self.ancestry.as_ref()
    }

    pub fn content(&self) -> Option<&StructureContent> {
        self.content.as_ref()
    }

    pub fn forest(&self) -> &CategoryForest {
        &self.forest
    }

    pub fn filter(&self) -> &ForestFilter {
        &self.filter
    }

    pub fn ledger(&self) -> &StructureLedger {
        &self.ledger
    }

    pub fn stats(&self) -> &NavigationStats {
        &self.stats
    }
}
