//! Indented text outlines
//!
//! ```text
//! Constants (1)
//!   const_1_1
//!     p: exp_1_2-2_1
//!     f: exp_1_2-2_1
//! Lines (1)
//!   ...
//! ```

use std::io::{self, Write};

use serde::Serialize;

use crate::core::ancestry::ProvenanceNode;
use crate::core::family::{CategoryForest, FamilyNode};

const INDENT: &str = "  ";

/// Write a provenance tree, one label per line.
pub fn write_provenance<W: Write>(out: &mut W, tree: &ProvenanceNode) -> io::Result<()> {
    write_provenance_node(out, tree, 0)
}

fn write_provenance_node<W: Write>(out: &mut W, node: &ProvenanceNode, depth: usize) -> io::Result<()> {
    writeln!(out, "{}{}", INDENT.repeat(depth), node.label())?;
    for child in &node.children {
        write_provenance_node(out, child, depth + 1)?;
    }
    Ok(())
}

/// Write every bucket of a forest under a `Title (count)` header.
pub fn write_forest<W: Write>(out: &mut W, forest: &CategoryForest) -> io::Result<()> {
    for (category, roots) in forest.iter() {
        writeln!(out, "{} ({})", category.title(), roots.len())?;
        for root in roots {
            write_family_node(out, root, 1)?;
        }
    }
    Ok(())
}

fn write_family_node<W: Write>(out: &mut W, node: &FamilyNode, depth: usize) -> io::Result<()> {
    writeln!(out, "{}{}", INDENT.repeat(depth), node.label())?;
    for child in &node.children {
        write_family_node(out, child, depth + 1)?;
    }
    Ok(())
}

/// Write any tree or forest as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}
