//! Reading an attribute bag into a state record.
//!
//! A snapshot walks the subject's bag once: the subscribed scalar
//! keys in order, then one level of nested children under the
//! reserved collection key. A subscribed key that has vanished from
//! the bag since creation is skipped — the key set may change between
//! polls, and absence is not an error at poll time.

use vigil_core::{
    AttributeSource, ObserveError, SubjectId, SubjectType, NESTED_COLLECTION_KEY,
};
use vigil_wire::StateRecord;

/// Check an explicit subscription against the bag's current key set.
///
/// Called once at observer creation, before any id is allocated, so a
/// misspelled key aborts creation with nothing registered. An empty
/// subscription means "all keys" and always passes.
pub fn validate_subscription(
    source: &dyn AttributeSource,
    subscription: &[String],
) -> Result<(), ObserveError> {
    let keys = source.keys();
    for key in subscription {
        if !keys.contains(key) {
            return Err(ObserveError::AttributeNotFound { key: key.clone() });
        }
    }
    Ok(())
}

/// The creation-time view of an observer's columns: its subscription,
/// or every key currently in the bag when the subscription is empty.
/// Used to configure sinks; an empty subscription's delivery columns
/// are resolved later, at the observer's first poll.
pub fn resolve_columns(source: &dyn AttributeSource, subscription: &[String]) -> Vec<String> {
    if subscription.is_empty() {
        source.keys()
    } else {
        subscription.to_vec()
    }
}

/// Read one full snapshot of `source` into a state record.
///
/// Nested children under [`NESTED_COLLECTION_KEY`] are always
/// collected, regardless of the subscription, with all of their own
/// attributes and no further descent.
pub fn take_snapshot(
    id: SubjectId,
    subject_type: SubjectType,
    source: &dyn AttributeSource,
    subscription: &[String],
) -> StateRecord {
    let mut record = StateRecord::new(id, subject_type);
    for key in resolve_columns(source, subscription) {
        if let Some(value) = source.get(&key) {
            record.push_attribute(key, value);
        }
    }
    for child in source.nested(NESTED_COLLECTION_KEY) {
        let mut nested = StateRecord::new(child.id, child.subject_type);
        for key in child.source.keys() {
            if let Some(value) = child.source.get(&key) {
                nested.push_attribute(key, value);
            }
        }
        record.push_nested(nested);
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{AttrValue, AttributeBag};

    fn bag() -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.set("temperature", AttrValue::Number(10.5));
        bag.set("humidity", AttrValue::Number(0.8));
        bag.set("label", AttrValue::Text("north".into()));
        bag
    }

    #[test]
    fn empty_subscription_reads_every_key_in_bag_order() {
        let rec = take_snapshot(SubjectId(1), SubjectType::Cell, &bag(), &[]);
        let keys: Vec<&str> = rec.attributes.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["temperature", "humidity", "label"]);
    }

    #[test]
    fn subscription_filters_and_orders_the_attributes() {
        let sub = vec!["label".to_string(), "temperature".to_string()];
        let rec = take_snapshot(SubjectId(1), SubjectType::Cell, &bag(), &sub);
        let keys: Vec<&str> = rec.attributes.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["label", "temperature"]);
    }

    #[test]
    fn vanished_subscribed_key_is_skipped_at_poll_time() {
        let sub = vec!["temperature".to_string(), "humidity".to_string()];
        let mut source = bag();
        validate_subscription(&source, &sub).unwrap();
        source.remove("humidity");
        let rec = take_snapshot(SubjectId(1), SubjectType::Cell, &source, &sub);
        assert_eq!(rec.attribs_number(), 1);
    }

    #[test]
    fn missing_subscription_key_fails_validation() {
        let sub = vec!["pressure".to_string()];
        assert_eq!(
            validate_subscription(&bag(), &sub),
            Err(ObserveError::AttributeNotFound {
                key: "pressure".into()
            })
        );
    }

    #[test]
    fn nested_children_are_collected_regardless_of_subscription() {
        let mut parent = bag();
        let mut cell = AttributeBag::new();
        cell.set("soil", AttrValue::Text("clay".into()));
        parent.push_nested(NESTED_COLLECTION_KEY, SubjectId(7), SubjectType::Cell, cell);

        let sub = vec!["temperature".to_string()];
        let rec = take_snapshot(SubjectId(1), SubjectType::Trajectory, &parent, &sub);
        assert_eq!(rec.items_number(), 1);
        assert_eq!(rec.nested[0].id, SubjectId(7));
        assert_eq!(rec.nested[0].attribs_number(), 1);
    }

    #[test]
    fn nesting_stops_at_one_level() {
        let mut grandchild = AttributeBag::new();
        grandchild.set("depth", AttrValue::Number(2.0));
        let mut child = AttributeBag::new();
        child.set("depth", AttrValue::Number(1.0));
        child.push_nested(
            NESTED_COLLECTION_KEY,
            SubjectId(99),
            SubjectType::Cell,
            grandchild,
        );
        let mut parent = AttributeBag::new();
        parent.push_nested(NESTED_COLLECTION_KEY, SubjectId(8), SubjectType::Cell, child);

        let rec = take_snapshot(SubjectId(1), SubjectType::Trajectory, &parent, &[]);
        assert_eq!(rec.nested.len(), 1);
        assert!(rec.nested[0].nested.is_empty());
    }
}
