//! The in-memory shape of an encoded observation message.
//!
//! A [`StateRecord`] is self-describing: its attribute and nested-item
//! counts are derived from the underlying vectors, so the invariant
//! `attribsNumber == len(rawAttributes)` (and likewise for nested
//! items) holds by construction. Both codecs write the derived counts
//! and both decoders verify them against the repeated fields they
//! actually read.

use smallvec::SmallVec;
use vigil_core::{AttrKind, AttrValue, SubjectId, SubjectType};

/// One (key, type-tag, value) triple of a record.
#[derive(Clone, Debug, PartialEq)]
pub struct RawAttribute {
    /// Attribute key, unique within one record.
    pub key: String,
    /// The attribute's value.
    pub value: AttrValue,
}

impl RawAttribute {
    /// Build an attribute triple.
    pub fn new(key: impl Into<String>, value: AttrValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// The wire type tag this attribute encodes under.
    pub fn kind(&self) -> AttrKind {
        self.value.kind()
    }
}

/// One subject's encoded state for one poll.
///
/// Holds the changed (or full, per sink policy) attribute set plus one
/// level of nested subject records, e.g. the member cells of a
/// trajectory. Constructed fresh per poll and handed off immediately.
#[derive(Clone, Debug, PartialEq)]
pub struct StateRecord {
    /// The subject's id.
    pub id: SubjectId,
    /// The subject's type tag.
    pub subject_type: SubjectType,
    /// The attribute triples, in snapshot order.
    pub attributes: SmallVec<[RawAttribute; 8]>,
    /// Nested subject records, in collection order.
    pub nested: Vec<StateRecord>,
}

impl StateRecord {
    /// An empty record for the given subject.
    pub fn new(id: SubjectId, subject_type: SubjectType) -> Self {
        Self {
            id,
            subject_type,
            attributes: SmallVec::new(),
            nested: Vec::new(),
        }
    }

    /// Append an attribute triple.
    pub fn push_attribute(&mut self, key: impl Into<String>, value: AttrValue) {
        self.attributes.push(RawAttribute::new(key, value));
    }

    /// Append a nested subject record.
    pub fn push_nested(&mut self, nested: StateRecord) {
        self.nested.push(nested);
    }

    /// The record's self-described attribute count.
    pub fn attribs_number(&self) -> usize {
        self.attributes.len()
    }

    /// The record's self-described nested-item count.
    pub fn items_number(&self) -> usize {
        self.nested.len()
    }

    /// Whether the record carries nothing at all — no attributes and
    /// no nested items. A diff poll with no changes produces this.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.nested.is_empty()
    }

    /// Look up an attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&RawAttribute> {
        self.attributes.iter().find(|a| a.key == key)
    }
}
