//! An owned, ordered attribute bag.
//!
//! [`AttributeBag`] is a concrete [`AttributeSource`] for hosts that
//! keep subject state in plain Rust rather than an embedded scripting
//! runtime, and for tests. Insertion order is preserved, matching the
//! ordered-keys contract of the trait.

use crate::id::{SubjectId, SubjectType};
use crate::traits::{AttributeSource, NestedSource};
use crate::value::AttrValue;
use indexmap::IndexMap;
use smallvec::SmallVec;

/// A nested child subject held by an [`AttributeBag`].
struct NestedChild {
    id: SubjectId,
    subject_type: SubjectType,
    bag: AttributeBag,
}

/// An insertion-ordered `key → value` store implementing
/// [`AttributeSource`].
///
/// Nested children registered via [`push_nested`](Self::push_nested)
/// are reported under the given key through
/// [`nested`](AttributeSource::nested); the key itself should also be
/// set to an opaque table value if it is meant to appear as an
/// attribute in its own right.
#[derive(Default)]
pub struct AttributeBag {
    values: IndexMap<String, AttrValue>,
    nested: IndexMap<String, SmallVec<[NestedChild; 2]>>,
}

impl AttributeBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an attribute, preserving first-insertion
    /// order for existing keys.
    pub fn set(&mut self, key: impl Into<String>, value: AttrValue) {
        self.values.insert(key.into(), value);
    }

    /// Remove an attribute. Removal is not signaled to observers; the
    /// diff cache simply stops seeing the key.
    pub fn remove(&mut self, key: &str) {
        self.values.shift_remove(key);
    }

    /// Append a nested child subject under `key`.
    pub fn push_nested(
        &mut self,
        key: impl Into<String>,
        id: SubjectId,
        subject_type: SubjectType,
        bag: AttributeBag,
    ) {
        self.nested.entry(key.into()).or_default().push(NestedChild {
            id,
            subject_type,
            bag,
        });
    }

    /// Number of attributes currently in the bag.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the bag holds no attributes.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl AttributeSource for AttributeBag {
    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    fn get(&self, key: &str) -> Option<AttrValue> {
        self.values.get(key).cloned()
    }

    fn nested(&self, key: &str) -> Vec<NestedSource<'_>> {
        match self.nested.get(key) {
            Some(children) => children
                .iter()
                .map(|c| NestedSource {
                    id: c.id,
                    subject_type: c.subject_type,
                    source: &c.bag,
                })
                .collect(),
            None => Vec::new(),
        }
    }
}
