//! Name codecs
//!
//! The builders consult a `NameCodec` for three things: which forest bucket
//! a structure belongs to, the canonical sibling order, and the domain and
//! shape attributes used by the forest filter.

use std::cmp::Ordering;

use crate::name::CanonicalName;
use crate::variant::Variant;

/// Classification, ordering and attribute extraction over structure names.
pub trait NameCodec {
    /// Variant encoded in the name, or `None` for foreign names.
    fn classify(&self, name: &str) -> Option<Variant>;

    /// Total order over names.
    fn compare(&self, a: &str, b: &str) -> Ordering;

    /// Coarse filter attribute.
    fn domain_of(&self, name: &str) -> Option<u32>;

    /// Fine filter attribute. Empty when the name carries no shape.
    fn shape_of(&self, name: &str) -> Vec<u32>;
}

/// Codec for the built-in `<tag>_<domain>[_<shape>]_<serial>` scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalCodec;

impl CanonicalCodec {
    pub fn new() -> Self {
        Self
    }
}

impl NameCodec for CanonicalCodec {
    fn classify(&self, name: &str) -> Option<Variant> {
        CanonicalName::parse(name).ok().map(|n| n.variant)
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        match (CanonicalName::parse(a), CanonicalName::parse(b)) {
            (Ok(pa), Ok(pb)) => pa.sort_key().cmp(&pb.sort_key()).then_with(|| a.cmp(b)),
            // Canonical names sort ahead of anything foreign
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => a.cmp(b),
        }
    }

    fn domain_of(&self, name: &str) -> Option<u32> {
        CanonicalName::parse(name).ok().map(|n| n.domain)
    }

    fn shape_of(&self, name: &str) -> Vec<u32> {
        CanonicalName::parse(name)
            .map(|n| n.shape)
            .unwrap_or_default()
    }
}
