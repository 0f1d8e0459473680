//! The observable face of one simulation entity.
//!
//! A subject ties together an id, a type tag, the run's observer
//! registry, and a private diff cache. Hosts call
//! [`Subject::notify`] after each simulation step with the entity's
//! current attribute bag; the subject builds the full snapshot and
//! the changed set once and fans the right one out to every observer.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use vigil_core::{AttributeSource, ObserveError, ObserverId, ObserverType, SubjectId, SubjectType};
use vigil_sinks::{build_sink, SinkConfig, SinkMode};
use vigil_wire::StateRecord;

use crate::diff::DiffCache;
use crate::registry::ObserverRegistry;
use crate::snapshot::{resolve_columns, take_snapshot, validate_subscription};

/// One observable simulation entity.
pub struct Subject {
    id: SubjectId,
    subject_type: SubjectType,
    registry: Arc<ObserverRegistry>,
    diff: Mutex<DiffCache>,
}

impl Subject {
    /// Attach an entity to the run's registry.
    pub fn new(id: SubjectId, subject_type: SubjectType, registry: Arc<ObserverRegistry>) -> Self {
        Self {
            id,
            subject_type,
            registry,
            diff: Mutex::new(DiffCache::new()),
        }
    }

    /// The subject's id.
    pub fn id(&self) -> SubjectId {
        self.id
    }

    /// The subject's type tag.
    pub fn subject_type(&self) -> SubjectType {
        self.subject_type
    }

    /// Create an observer from an untyped observer-kind code, as
    /// handed over by a scripting binding.
    pub fn create_observer_by_code(
        &self,
        code: i32,
        subscription: Vec<String>,
        config: &SinkConfig,
        source: &dyn AttributeSource,
    ) -> Result<ObserverId, ObserveError> {
        let ty = ObserverType::from_code(code)
            .ok_or(ObserveError::UnknownObserverType { code })?;
        self.create_observer(ty, subscription, config, source)
    }

    /// Create an observer of `ty` watching `subscription`.
    ///
    /// Validation runs before any id is allocated, in a fixed order:
    /// the subscription against the bag's current keys, then the
    /// sink's own configuration. A failure leaves the registry
    /// untouched. An empty subscription watches every attribute
    /// present at the observer's first poll.
    pub fn create_observer(
        &self,
        ty: ObserverType,
        subscription: Vec<String>,
        config: &SinkConfig,
        source: &dyn AttributeSource,
    ) -> Result<ObserverId, ObserveError> {
        if ty.is_spatial() {
            // Maps and images render the run's shared cellular space;
            // they are tracked for kill-by-id but deliver elsewhere.
            let id = self.registry.register_spatial(ty);
            debug!(subject = %self.id, observer = %id, kind = %ty, "spatial observer registered");
            return Ok(id);
        }

        validate_subscription(source, &subscription)?;
        let columns = resolve_columns(source, &subscription);
        let snapshot = take_snapshot(self.id, self.subject_type, source, &subscription);
        let sink = build_sink(ty, config, &columns, &snapshot)?;
        let id = self.registry.register(self.id, subscription, sink);
        debug!(subject = %self.id, observer = %id, kind = %ty, "observer registered");
        Ok(id)
    }

    /// Poll the subject and deliver to every observer.
    ///
    /// Builds the full snapshot once and the changed set once, then
    /// walks the observers in registration order, handing each the
    /// view matching its mode, projected onto its columns in column
    /// order. Observers created with an empty subscription resolve
    /// their column set here, on first delivery. A sink failure is
    /// logged and skipped. Returns how many observers accepted
    /// delivery.
    pub fn notify(&self, time: f64, source: &dyn AttributeSource) -> usize {
        let observers = self.registry.observers_of(self.id);
        if observers.is_empty() {
            return 0;
        }

        let full = take_snapshot(self.id, self.subject_type, source, &[]);
        let changed = self
            .diff
            .lock()
            .expect("diff cache poisoned")
            .diff(&full);

        let mut delivered = 0;
        for entry in observers {
            let mut observer = entry.lock().expect("observer poisoned");
            if observer.columns.is_none() {
                observer.columns =
                    Some(full.attributes.iter().map(|a| a.key.clone()).collect());
            }
            let record = {
                let columns = observer.columns.as_deref().unwrap_or_default();
                match observer.sink.mode() {
                    SinkMode::Full => project(&full, columns),
                    SinkMode::Diff => project(&changed, columns),
                }
            };
            let id = observer.id;
            match observer.sink.accept(time, &record) {
                Ok(()) => delivered += 1,
                Err(e) => warn!(subject = %self.id, observer = %id, "delivery failed: {e}"),
            }
        }
        delivered
    }

    /// Kill one observer, closing its sink.
    ///
    /// Falls back to the run's spatial index when the id is not a
    /// local observer of this subject. Returns whether anything was
    /// actually removed; the id is retired either way.
    pub fn kill(&self, id: ObserverId) -> bool {
        if let Some(entry) = self.registry.unregister(self.id, id) {
            let mut observer = entry.lock().expect("observer poisoned");
            if let Err(e) = observer.sink.close() {
                warn!(subject = %self.id, observer = %id, "close failed: {e}");
            }
            return true;
        }
        self.registry.unregister_spatial(id)
    }
}

/// Restrict a record to the attributes an observer subscribed to,
/// in the observer's column order. Nested children are always
/// carried through.
fn project(record: &StateRecord, columns: &[String]) -> StateRecord {
    let mut projected = StateRecord::new(record.id, record.subject_type);
    for key in columns {
        if let Some(attr) = record.attribute(key) {
            projected.push_attribute(attr.key.clone(), attr.value.clone());
        }
    }
    for nested in &record.nested {
        projected.push_nested(nested.clone());
    }
    projected
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{AttrValue, AttributeBag};

    fn registry() -> Arc<ObserverRegistry> {
        Arc::new(ObserverRegistry::new())
    }

    fn bag() -> AttributeBag {
        let mut bag = AttributeBag::new();
        bag.set("temperature", AttrValue::Number(10.5));
        bag.set("humidity", AttrValue::Number(0.8));
        bag
    }

    #[test]
    fn unknown_code_is_rejected_before_anything_else() {
        let subject = Subject::new(SubjectId(1), SubjectType::Cell, registry());
        let err = subject
            .create_observer_by_code(42, vec![], &SinkConfig::default(), &bag())
            .unwrap_err();
        assert_eq!(err, ObserveError::UnknownObserverType { code: 42 });
    }

    #[test]
    fn failed_creation_allocates_no_id() {
        let registry = registry();
        let subject = Subject::new(SubjectId(1), SubjectType::Cell, Arc::clone(&registry));

        let err = subject
            .create_observer(
                ObserverType::Table,
                vec!["pressure".into()],
                &SinkConfig::default(),
                &bag(),
            )
            .unwrap_err();
        assert_eq!(
            err,
            ObserveError::AttributeNotFound {
                key: "pressure".into()
            }
        );
        assert_eq!(registry.observer_count(SubjectId(1)), 0);

        // The next successful creation still gets the first id.
        let id = subject
            .create_observer(ObserverType::Table, vec![], &SinkConfig::default(), &bag())
            .unwrap();
        assert_eq!(id, ObserverId(1));
    }

    #[test]
    fn notify_without_observers_is_free() {
        let subject = Subject::new(SubjectId(1), SubjectType::Cell, registry());
        assert_eq!(subject.notify(1.0, &bag()), 0);
    }

    #[test]
    fn kill_unknown_id_reports_false() {
        let subject = Subject::new(SubjectId(1), SubjectType::Cell, registry());
        assert!(!subject.kill(ObserverId(5)));
    }

    #[test]
    fn spatial_observer_registers_in_the_spatial_index_and_kill_finds_it() {
        let registry = registry();
        let subject = Subject::new(SubjectId(1), SubjectType::CellularSpace, Arc::clone(&registry));
        let id = subject
            .create_observer(ObserverType::Map, vec![], &SinkConfig::default(), &bag())
            .unwrap();
        assert_eq!(registry.observer_count(SubjectId(1)), 0);
        assert_eq!(registry.spatial_count(), 1);
        assert!(subject.kill(id));
        assert_eq!(registry.spatial_count(), 0);
    }

    #[test]
    fn projection_keeps_subscription_columns_only() {
        let mut record = StateRecord::new(SubjectId(1), SubjectType::Cell);
        record.push_attribute("a", AttrValue::Number(1.0));
        record.push_attribute("b", AttrValue::Number(2.0));
        let projected = project(&record, &["b".to_string()]);
        assert_eq!(projected.attribs_number(), 1);
        assert_eq!(projected.attributes[0].key, "b");
    }

    #[test]
    fn projection_follows_column_order_not_record_order() {
        let mut record = StateRecord::new(SubjectId(1), SubjectType::Cell);
        record.push_attribute("a", AttrValue::Number(1.0));
        record.push_attribute("b", AttrValue::Number(2.0));
        let projected = project(&record, &["b".to_string(), "a".to_string()]);
        let keys: Vec<&str> = projected.attributes.iter().map(|x| x.key.as_str()).collect();
        assert_eq!(keys, ["b", "a"]);
    }
}
