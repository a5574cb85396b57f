//! Ledger View Tests
//!
//! Properties of the two views over whole ledgers:
//! - Provenance trees: role order, node counts, unresolved leaves
//! - Family forests: bucket coverage, sibling order, filters
//! - Navigator sessions over a JSON ledger on disk

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fs;

use krystal_observatory::core::{
    strip_role_prefix, AncestorTreeBuilder, Definition, DescendantForestBuilder, FamilyNode,
    ForestCategory, ForestFilter, JsonStorage, Navigator, ProvenanceNode, StructureLedger,
};
use krystal_observatory::{CanonicalCodec, NameCodec, Variant};
use tempfile::TempDir;

/// A ledger with every variant, a diamond, an edit and a foreign entry.
fn library() -> StructureLedger {
    StructureLedger::from_definitions(vec![
        Definition::source("const_1_1", Variant::Constant),
        Definition::source("const_4_2", Variant::Constant),
        Definition::source("line_1_1", Variant::Line),
        Definition::source("line_2_2", Variant::Line),
        Definition::new("exp_1_2-2_1", Variant::Expansion, ["line_1_1", "const_1_1", "const_1_1"]),
        Definition::new(
            "sexp_2_2-2-1_2",
            Variant::ShapedExpansion,
            ["line_2_2", "const_1_1", "line_1_1", "line_1_1", "exp_1_2-2_1"],
        ),
        Definition::new("mod_2_3", Variant::Modulation, ["exp_1_2-2_1", "sexp_2_2-2-1_2", "const_4_2"]),
        Definition::new("perm_3_3-1_4", Variant::Permutation, ["mod_2_3", "line_2_2", "line_1_1"]),
        Definition::new("path_1_5", Variant::Path, ["perm_3_3-1_4", "exp_1_2-2_1"]),
        // Edit: the modulation is regenerated from different inputs
        Definition::new("mod_2_3", Variant::Modulation, ["exp_1_2-2_1", "line_2_2", "const_4_2"]),
        Definition::source("imported sketch", Variant::Line),
    ])
}

fn count_family(node: &FamilyNode) -> usize {
    1 + node.children.iter().map(count_family).sum::<usize>()
}

fn assert_family_sorted(node: &FamilyNode, codec: &dyn NameCodec) {
    for pair in node.children.windows(2) {
        let a = pair[0].label();
        let b = pair[1].label();
        assert_ne!(
            codec.compare(strip_role_prefix(&a), strip_role_prefix(&b)),
            Ordering::Greater,
            "siblings {} and {} out of order under {}",
            a,
            b,
            node.name
        );
    }
    for child in &node.children {
        assert_family_sorted(child, codec);
    }
}

fn expected_size(ledger: &StructureLedger, name: &str) -> usize {
    match ledger.resolve(name) {
        Some(def) => {
            let table = krystal_observatory::core::RoleTable::new();
            1 + table
                .roles(def.variant)
                .iter()
                .filter_map(|role| def.input(role.slot))
                .map(|input| expected_size(ledger, input.as_str()))
                .sum::<usize>()
        }
        None => 1,
    }
}

// =============================================================================
// Provenance Trees
// =============================================================================

#[test]
fn test_provenance_size_matches_recurrence() {
    let ledger = library();
    let builder = AncestorTreeBuilder::new(&ledger);
    for def in ledger.iter() {
        let tree = builder.build(def.output.as_str()).unwrap();
        assert_eq!(tree.size(), expected_size(&ledger, def.output.as_str()));
    }
}

#[test]
fn test_provenance_uses_latest_definition() {
    let ledger = library();
    let tree = AncestorTreeBuilder::new(&ledger).build("mod_2_3").unwrap();
    assert_eq!(
        tree.child_labels(),
        vec!["x: exp_1_2-2_1", "y: line_2_2", "field: const_4_2"]
    );
}

#[test]
fn test_provenance_shaped_expansion_roles() {
    let ledger = library();
    let tree = AncestorTreeBuilder::new(&ledger).build("sexp_2_2-2-1_2").unwrap();
    assert_eq!(
        tree.child_labels(),
        vec![
            "density: line_2_2",
            "points: const_1_1",
            "axis: line_1_1",
            "contour: line_1_1",
            "field: exp_1_2-2_1",
        ]
    );
    // The expansion in the field slot is expanded in turn
    let field: &ProvenanceNode = &tree.children[4];
    assert_eq!(field.children.len(), 3);
}

#[test]
fn test_provenance_depth_is_longest_chain() {
    let ledger = library();
    let tree = AncestorTreeBuilder::new(&ledger).build("path_1_5").unwrap();
    // path -> perm -> mod -> exp -> line
    assert_eq!(tree.depth(), 5);
}

// =============================================================================
// Family Forests
// =============================================================================

#[test]
fn test_forest_covers_every_classifiable_entry_once() {
    let ledger = library();
    let codec = CanonicalCodec::new();
    let forest = DescendantForestBuilder::new(&ledger, &codec)
        .build_forest(&ForestFilter::none())
        .unwrap();

    let roots = forest.root_names();
    let unique: BTreeSet<&str> = roots.iter().copied().collect();
    assert_eq!(roots.len(), unique.len());

    let classifiable: BTreeSet<&str> = ledger
        .iter()
        .map(|d| d.output.as_str())
        .filter(|n| codec.classify(n).is_some())
        .collect();
    assert_eq!(unique, classifiable);
    assert!(!unique.contains("imported sketch"));
}

#[test]
fn test_forest_buckets() {
    let ledger = library();
    let codec = CanonicalCodec::new();
    let forest = DescendantForestBuilder::new(&ledger, &codec)
        .build_forest(&ForestFilter::none())
        .unwrap();

    let names = |c: ForestCategory| -> Vec<String> {
        forest.bucket(c).iter().map(|n| n.name.to_string()).collect()
    };
    assert_eq!(names(ForestCategory::Constants), vec!["const_1_1", "const_4_2"]);
    assert_eq!(names(ForestCategory::Lines), vec!["line_1_1", "line_2_2"]);
    assert_eq!(names(ForestCategory::Expansions), vec!["exp_1_2-2_1", "sexp_2_2-2-1_2"]);
    assert_eq!(names(ForestCategory::Modulations), vec!["mod_2_3"]);
    assert_eq!(names(ForestCategory::Permutations), vec!["perm_3_3-1_4"]);
    assert_eq!(names(ForestCategory::Paths), vec!["path_1_5"]);
    assert!(forest.iter().flat_map(|(_, roots)| roots).all(|r| r.role.is_none()));
}

#[test]
fn test_forest_siblings_sorted_everywhere() {
    let ledger = library();
    let codec = CanonicalCodec::new();
    let forest = DescendantForestBuilder::new(&ledger, &codec)
        .build_forest(&ForestFilter::none())
        .unwrap();
    for (_, roots) in forest.iter() {
        for root in roots {
            assert_family_sorted(root, &codec);
        }
    }
}

#[test]
fn test_forest_fan_out_across_variants() {
    let ledger = library();
    let codec = CanonicalCodec::new();
    let node = DescendantForestBuilder::new(&ledger, &codec)
        .build_node("line_1_1")
        .unwrap();

    assert_eq!(
        node.child_labels(),
        vec![
            "d: exp_1_2-2_1",
            "a: sexp_2_2-2-1_2",
            "c: sexp_2_2-2-1_2",
            "c: perm_3_3-1_4",
        ]
    );
    assert!(count_family(&node) > node.children.len());
}

#[test]
fn test_stale_definition_leaves_no_edges() {
    let ledger = library();
    let codec = CanonicalCodec::new();
    let sexp = DescendantForestBuilder::new(&ledger, &codec)
        .build_node("sexp_2_2-2-1_2")
        .unwrap();
    // Only the overwritten modulation read the shaped expansion
    assert!(sexp.is_leaf());
}

#[test]
fn test_domain_filter_example() {
    let ledger = StructureLedger::from_definitions(vec![
        Definition::new("exp_2_1", Variant::Expansion, ["line_1_1", "const_5_1", "line_1_1"]),
        Definition::source("const_5_1", Variant::Constant),
    ]);
    let codec = CanonicalCodec::new();
    let builder = DescendantForestBuilder::new(&ledger, &codec);
    let forest = builder.build_forest(&ForestFilter::new(Some(3), None)).unwrap();

    assert_eq!(forest.root_names(), vec!["exp_2_1"]);

    let unfiltered = builder.build_forest(&ForestFilter::none()).unwrap();
    assert_eq!(unfiltered.constants[0].child_labels(), vec!["p: exp_2_1"]);
}

#[test]
fn test_forest_rebuild_is_identical() {
    let ledger = library();
    let codec = CanonicalCodec::new();
    let builder = DescendantForestBuilder::new(&ledger, &codec);
    let filter = ForestFilter::new(Some(2), Some(vec![2, 2]));
    assert_eq!(
        builder.build_forest(&filter).unwrap(),
        builder.build_forest(&filter).unwrap()
    );
}

// =============================================================================
// Navigator over a JSON ledger
// =============================================================================

const LEDGER_JSON: &str = r#"{
    "version": "1.0",
    "definitions": [
        {"output": "const_1_1", "variant": "constant"},
        {"output": "line_1_1", "variant": "line"},
        {"output": "exp_1_2-2_1", "variant": "expansion", "inputs": ["line_1_1", "const_1_1", "const_1_1"]}
    ]
}"#;

#[test]
fn test_navigator_session_on_disk() {
    let dir = TempDir::new().unwrap();
    let ledger_path = dir.path().join("ledger.json");
    fs::write(&ledger_path, LEDGER_JSON).unwrap();
    let content_dir = dir.path().join("content");
    fs::create_dir_all(&content_dir).unwrap();
    fs::write(
        content_dir.join("exp_1_2-2_1.json"),
        r#"{"level": 3, "strands": [[1, 1, 2]], "missing": ["field"]}"#,
    )
    .unwrap();

    let mut nav = Navigator::open(
        Box::new(JsonStorage::new().with_content_dir(&content_dir)),
        &ledger_path,
        Box::new(CanonicalCodec::new()),
        ForestFilter::none(),
    )
    .unwrap();

    let tree = nav.select("exp_1_2-2_1").unwrap();
    assert_eq!(
        tree.child_labels(),
        vec!["density: line_1_1", "points: const_1_1", "field: const_1_1"]
    );
    let content = nav.content().unwrap();
    assert_eq!(content.level, Some(3));
    assert_eq!(content.missing, vec!["field".to_string()]);

    let forest = nav.set_filter(None, None).unwrap();
    assert_eq!(forest.constants.len(), 1);
    assert_eq!(forest.lines.len(), 1);
    assert_eq!(forest.expansions.len(), 1);
    assert_eq!(nav.selection().unwrap(), "exp_1_2-2_1");
}
