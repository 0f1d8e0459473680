//! Core types and traits for the Vigil observation framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Vigil workspace:
//! subject/observer identifiers and type tags, the tagged attribute
//! value model, error types, and the [`AttributeSource`] capability
//! trait that decouples the diff/encode core from any specific
//! embedded-language attribute bag.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bag;
pub mod error;
pub mod id;
pub mod traits;
pub mod value;

pub use bag::AttributeBag;
pub use error::{ObserveError, SinkError, TransportError, WireError};
pub use id::{ObserverId, ObserverType, OpaqueHandle, SubjectId, SubjectType};
pub use traits::{AttributeSource, NestedSource, NESTED_COLLECTION_KEY};
pub use value::{AttrKind, AttrValue, OpaqueKind};
