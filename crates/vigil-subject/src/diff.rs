//! Change detection over serialized attribute values.
//!
//! The cache maps `(subject id, key)` to the last serialized text of
//! that attribute and emits an attribute only when the text differs.
//! Comparing serialized forms rather than raw values means the cache
//! and the wire agree exactly on what "changed" means: if two polls
//! serialize identically, nothing is emitted. Entries are never
//! expired and removal of a key is not signaled; the cache simply
//! stops seeing it.

use std::collections::HashMap;

use vigil_core::SubjectId;
use vigil_wire::fmt::serialize_value;
use vigil_wire::StateRecord;

/// Last-seen serialized values for one subject and its nested children.
#[derive(Default)]
pub struct DiffCache {
    seen: HashMap<(SubjectId, String), String>,
}

impl DiffCache {
    /// An empty cache; the first poll through it emits everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `(subject, key)` pairs the cache has seen.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether the cache has seen nothing yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Reduce a full snapshot to the attributes that changed since the
    /// last call, updating the cache as it goes.
    ///
    /// Nested children are diffed under their own subject ids and
    /// included only when they changed themselves. A poll with no
    /// changes anywhere yields an empty record.
    pub fn diff(&mut self, full: &StateRecord) -> StateRecord {
        let mut changed = StateRecord::new(full.id, full.subject_type);
        self.diff_attributes(full, &mut changed);
        for child in &full.nested {
            let mut nested = StateRecord::new(child.id, child.subject_type);
            self.diff_attributes(child, &mut nested);
            if !nested.is_empty() {
                changed.push_nested(nested);
            }
        }
        changed
    }

    fn diff_attributes(&mut self, full: &StateRecord, out: &mut StateRecord) {
        for attr in &full.attributes {
            let serialized = serialize_value(&attr.value);
            let cache_key = (full.id, attr.key.clone());
            if self.seen.get(&cache_key).map(String::as_str) != Some(serialized.as_str()) {
                self.seen.insert(cache_key, serialized);
                out.push_attribute(attr.key.clone(), attr.value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{AttrValue, SubjectType};

    fn full(attrs: &[(&str, f64)]) -> StateRecord {
        let mut rec = StateRecord::new(SubjectId(1), SubjectType::Cell);
        for (k, v) in attrs {
            rec.push_attribute(*k, AttrValue::Number(*v));
        }
        rec
    }

    #[test]
    fn first_poll_emits_everything() {
        let mut cache = DiffCache::new();
        let changed = cache.diff(&full(&[("a", 1.0), ("b", 2.0)]));
        assert_eq!(changed.attribs_number(), 2);
    }

    #[test]
    fn unchanged_poll_emits_nothing() {
        let mut cache = DiffCache::new();
        cache.diff(&full(&[("a", 1.0), ("b", 2.0)]));
        let changed = cache.diff(&full(&[("a", 1.0), ("b", 2.0)]));
        assert!(changed.is_empty());
    }

    #[test]
    fn only_the_changed_attribute_is_emitted() {
        let mut cache = DiffCache::new();
        cache.diff(&full(&[("a", 1.0), ("b", 2.0)]));
        let changed = cache.diff(&full(&[("a", 1.0), ("b", 3.0)]));
        assert_eq!(changed.attribs_number(), 1);
        assert_eq!(changed.attributes[0].key, "b");
    }

    #[test]
    fn equal_serializations_through_different_arithmetic_stay_quiet() {
        let mut cache = DiffCache::new();
        cache.diff(&full(&[("a", 11.0)]));
        // 2.2 * 5.0 == 11.0 exactly in f64; serializes to "11" both times.
        let changed = cache.diff(&full(&[("a", 2.2_f64 * 5.0)]));
        assert!(changed.is_empty());
    }

    #[test]
    fn nested_children_diff_under_their_own_ids() {
        let mut parent = full(&[("total", 2.0)]);
        let mut cell_a = StateRecord::new(SubjectId(10), SubjectType::Cell);
        cell_a.push_attribute("soil", AttrValue::Text("clay".into()));
        let mut cell_b = StateRecord::new(SubjectId(11), SubjectType::Cell);
        cell_b.push_attribute("soil", AttrValue::Text("sand".into()));
        parent.push_nested(cell_a);
        parent.push_nested(cell_b.clone());

        let mut cache = DiffCache::new();
        cache.diff(&parent);

        // Same snapshot, except one cell's soil changed.
        parent.nested[0].attributes[0].value = AttrValue::Text("silt".into());
        let changed = cache.diff(&parent);
        assert!(changed.attributes.is_empty());
        assert_eq!(changed.items_number(), 1);
        assert_eq!(changed.nested[0].id, SubjectId(10));
    }

    #[test]
    fn same_key_on_different_subjects_does_not_collide() {
        let mut cache = DiffCache::new();
        cache.diff(&full(&[("soil", 1.0)]));
        let mut other = StateRecord::new(SubjectId(2), SubjectType::Cell);
        other.push_attribute("soil", AttrValue::Number(1.0));
        // Different subject id, so its first poll emits despite the
        // identical key and value.
        let changed = cache.diff(&other);
        assert_eq!(changed.attribs_number(), 1);
    }

    #[test]
    fn removed_key_is_silent_and_reappearing_unchanged_value_stays_quiet() {
        let mut cache = DiffCache::new();
        cache.diff(&full(&[("a", 1.0), ("b", 2.0)]));
        let changed = cache.diff(&full(&[("a", 1.0)]));
        assert!(changed.is_empty());
        // "b" comes back with its old value; the cache still knows it.
        let changed = cache.diff(&full(&[("a", 1.0), ("b", 2.0)]));
        assert!(changed.is_empty());
    }
}
