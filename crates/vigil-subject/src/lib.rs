//! Subject-side observation: snapshots, diffing, and fan-out.
//!
//! A [`Subject`] is the observable face of one simulation entity. Each
//! poll reads the entity's attribute bag into a full state record,
//! runs it through the per-subject [`DiffCache`] to get the changed
//! set, and delivers one of the two — per each observer's declared
//! mode — to every registered sink in registration order. A failing
//! sink is logged and skipped; it never blocks the remaining
//! observers or the simulation thread.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod diff;
pub mod registry;
pub mod snapshot;
pub mod subject;

pub use diff::DiffCache;
pub use registry::ObserverRegistry;
pub use snapshot::take_snapshot;
pub use subject::Subject;
