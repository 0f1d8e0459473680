//! Vigil: a state observation layer for spatial simulations.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Vigil sub-crates. For most users, adding `vigil` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use vigil::prelude::*;
//!
//! // The run-wide registry and one observable entity.
//! let registry = Arc::new(ObserverRegistry::new());
//! let subject = Subject::new(SubjectId(1), SubjectType::Cell, Arc::clone(&registry));
//!
//! // The entity's attribute bag, as the host sees it.
//! let mut bag = AttributeBag::new();
//! bag.set("temperature", AttrValue::Number(10.5));
//!
//! // Watch every attribute through a last-known-value table.
//! let id = subject
//!     .create_observer(ObserverType::Table, vec![], &SinkConfig::default(), &bag)
//!     .unwrap();
//!
//! // One poll per simulation step; only changes flow to diff sinks.
//! assert_eq!(subject.notify(1.0, &bag), 1);
//! bag.set("temperature", AttrValue::Number(11.0));
//! assert_eq!(subject.notify(2.0, &bag), 1);
//!
//! assert!(subject.kill(id));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `vigil-core` | Ids, values, the attribute-source trait, errors |
//! | [`wire`] | `vigil-wire` | State records and the text/binary codecs |
//! | [`net`] | `vigil-net` | UDP transport and the compression envelope |
//! | [`sinks`] | `vigil-sinks` | Sink adapters and their configuration |
//! | [`subject`] | `vigil-subject` | Subjects, the diff cache, the registry |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub use vigil_core as types;
pub use vigil_net as net;
pub use vigil_sinks as sinks;
pub use vigil_subject as subject;
pub use vigil_wire as wire;

/// The types most embeddings need, in one import.
pub mod prelude {
    pub use vigil_core::{
        AttrKind, AttrValue, AttributeBag, AttributeSource, ObserveError, ObserverId,
        ObserverType, SinkError, SubjectId, SubjectType, NESTED_COLLECTION_KEY,
    };
    pub use vigil_sinks::{Sink, SinkConfig, SinkMode};
    pub use vigil_subject::{DiffCache, ObserverRegistry, Subject};
    pub use vigil_wire::{StateRecord, WireFormat};
}
