//! Observer bookkeeping for a simulation run.
//!
//! One registry serves every subject of a run. Observer ids come from
//! a single monotonic counter and are never reused: killing an
//! observer retires its id permanently, so a stale id held by a script
//! can never alias a later observer. Local observers are kept per
//! subject in registration order, which is also delivery order;
//! spatial observers (maps, images) attach to the run's shared
//! cellular space and are tracked in a separate index so a kill by id
//! can still find them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use vigil_core::{ObserverId, ObserverType, SubjectId};
use vigil_sinks::Sink;

/// One registered local observer.
pub struct Registered {
    /// The observer's run-unique id.
    pub id: ObserverId,
    /// The attribute keys the observer watches, in subscription order.
    ///
    /// `None` for observers created with an empty subscription, which
    /// watch every attribute present at their first poll; the set is
    /// resolved and frozen at first delivery.
    pub columns: Option<Vec<String>>,
    /// The delivery end.
    pub sink: Box<dyn Sink>,
}

type SharedObserver = Arc<Mutex<Registered>>;

/// Run-wide observer table and id allocator.
pub struct ObserverRegistry {
    next_id: AtomicU32,
    local: Mutex<HashMap<SubjectId, Vec<SharedObserver>>>,
    spatial: Mutex<Vec<(ObserverId, ObserverType)>>,
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObserverRegistry {
    /// An empty registry; the first observer gets id 1.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU32::new(1),
            local: Mutex::new(HashMap::new()),
            spatial: Mutex::new(Vec::new()),
        }
    }

    fn allocate_id(&self) -> ObserverId {
        ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Register a local observer for `subject`, allocating its id.
    ///
    /// An empty `subscription` defers column resolution to the
    /// observer's first delivery.
    pub fn register(
        &self,
        subject: SubjectId,
        subscription: Vec<String>,
        sink: Box<dyn Sink>,
    ) -> ObserverId {
        let id = self.allocate_id();
        let columns = if subscription.is_empty() {
            None
        } else {
            Some(subscription)
        };
        let entry = Arc::new(Mutex::new(Registered { id, columns, sink }));
        self.local
            .lock()
            .expect("observer table poisoned")
            .entry(subject)
            .or_default()
            .push(entry);
        id
    }

    /// Register a spatial observer, allocating its id from the same
    /// counter as local ones.
    pub fn register_spatial(&self, observer_type: ObserverType) -> ObserverId {
        let id = self.allocate_id();
        self.spatial
            .lock()
            .expect("spatial index poisoned")
            .push((id, observer_type));
        id
    }

    /// Snapshot of `subject`'s observers, in registration order.
    ///
    /// The returned handles are cloned out of the table so delivery
    /// can proceed without holding the registry lock.
    pub fn observers_of(&self, subject: SubjectId) -> Vec<SharedObserver> {
        self.local
            .lock()
            .expect("observer table poisoned")
            .get(&subject)
            .cloned()
            .unwrap_or_default()
    }

    /// Remove a local observer, returning its handle for closing.
    pub fn unregister(&self, subject: SubjectId, id: ObserverId) -> Option<SharedObserver> {
        let mut local = self.local.lock().expect("observer table poisoned");
        let observers = local.get_mut(&subject)?;
        let pos = observers
            .iter()
            .position(|entry| entry.lock().expect("observer poisoned").id == id)?;
        Some(observers.remove(pos))
    }

    /// Remove a spatial observer by id. `false` if the id is unknown.
    pub fn unregister_spatial(&self, id: ObserverId) -> bool {
        let mut spatial = self.spatial.lock().expect("spatial index poisoned");
        match spatial.iter().position(|(sid, _)| *sid == id) {
            Some(pos) => {
                spatial.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Number of local observers registered for `subject`.
    pub fn observer_count(&self, subject: SubjectId) -> usize {
        self.local
            .lock()
            .expect("observer table poisoned")
            .get(&subject)
            .map_or(0, Vec::len)
    }

    /// Number of spatial observers currently registered.
    pub fn spatial_count(&self) -> usize {
        self.spatial.lock().expect("spatial index poisoned").len()
    }
}
