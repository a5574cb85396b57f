//! Structure names
//!
//! `StructureName` is the opaque identifier the ledger is keyed by.
//! `CanonicalName` is its parsed form under the built-in naming scheme:
//!
//! ```text
//! <tag>_<domain>[_<s1>-<s2>-...]_<serial>
//!
//! const_1_7        constant, domain 1, no shape, serial 7
//! exp_3_2-2_14     expansion, domain 3, shape [2, 2], serial 14
//! ```

use std::borrow::Borrow;
use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{NameError, Result};
use crate::variant::Variant;

lazy_static! {
    static ref CANONICAL_PATTERN: Regex =
        Regex::new(r"^([a-z]+)_(\d+)(?:_(\d+(?:-\d+)*))?_(\d+)$").unwrap();
}

// =============================================================================
// StructureName
// =============================================================================

/// Name of a structure as recorded in the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructureName(String);

impl StructureName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StructureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for StructureName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StructureName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StructureName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for StructureName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for StructureName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for StructureName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// =============================================================================
// CanonicalName
// =============================================================================

/// Parsed canonical structure name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalName {
    pub variant: Variant,
    pub domain: u32,
    pub shape: Vec<u32>,
    pub serial: u64,
}

impl CanonicalName {
    /// Parse a canonical name.
    pub fn parse(text: &str) -> Result<Self> {
        let caps = CANONICAL_PATTERN
            .captures(text)
            .ok_or_else(|| NameError::NotCanonical(text.to_string()))?;

        let tag = &caps[1];
        let variant = Variant::from_tag(tag).ok_or_else(|| NameError::UnknownTag {
            name: text.to_string(),
            tag: tag.to_string(),
        })?;

        let out_of_range = || NameError::OutOfRange(text.to_string());
        let domain = caps[2].parse::<u32>().map_err(|_| out_of_range())?;
        let shape = match caps.get(3) {
            Some(m) => m
                .as_str()
                .split('-')
                .map(|part| part.parse::<u32>().map_err(|_| out_of_range()))
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };
        let serial = caps[4].parse::<u64>().map_err(|_| out_of_range())?;

        Ok(Self {
            variant,
            domain,
            shape,
            serial,
        })
    }

    /// Sort key: variant, then domain, then shape, then serial.
    pub fn sort_key(&self) -> (u8, u32, &[u32], u64) {
        (self.variant.rank(), self.domain, &self.shape, self.serial)
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.variant.tag(), self.domain)?;
        if !self.shape.is_empty() {
            let shape: Vec<String> = self.shape.iter().map(|s| s.to_string()).collect();
            write!(f, "_{}", shape.join("-"))?;
        }
        write!(f, "_{}", self.serial)
    }
}
