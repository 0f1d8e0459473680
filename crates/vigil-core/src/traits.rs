//! The attribute-bag capability trait.
//!
//! [`AttributeSource`] decouples the snapshot/diff/encode core from
//! the host's embedded-language attribute bag. The core reads ordered
//! keys, tagged values, and one level of nested subjects through this
//! trait and never sees the underlying representation.

use crate::id::{SubjectId, SubjectType};
use crate::value::AttrValue;

/// The reserved attribute key naming a subject's nested collection.
///
/// A trajectory's member cells live under this key. It is always
/// included in a snapshot regardless of the observer's subscription
/// list and triggers collection of one level of nested subjects.
pub const NESTED_COLLECTION_KEY: &str = "cells";

/// A nested subject reachable from a parent's attribute bag.
///
/// Nesting is one level deep by contract: the nested source's own
/// nested collection is not descended into.
pub struct NestedSource<'a> {
    /// The nested subject's id.
    pub id: SubjectId,
    /// The nested subject's type tag.
    pub subject_type: SubjectType,
    /// Read access to the nested subject's attributes.
    pub source: &'a dyn AttributeSource,
}

/// Read-only access to one subject's dynamic attribute bag.
///
/// Implemented by the host (or by [`AttributeBag`](crate::AttributeBag)
/// for tests and simple embeddings). Key order is meaningful and must
/// be stable within one call to [`keys`](Self::keys); the key set may
/// change between polls.
pub trait AttributeSource {
    /// The bag's attribute keys, in bag order.
    fn keys(&self) -> Vec<String>;

    /// Read one attribute. `None` if the key is absent.
    fn get(&self, key: &str) -> Option<AttrValue>;

    /// The nested subjects stored under `key`, in collection order.
    ///
    /// Only consulted for [`NESTED_COLLECTION_KEY`]. The default
    /// implementation reports no nesting.
    fn nested(&self, key: &str) -> Vec<NestedSource<'_>> {
        let _ = key;
        Vec::new()
    }
}
