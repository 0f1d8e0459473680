//! State record model and wire codecs for Vigil observation messages.
//!
//! An encoded message is an ordered record: subject id, subject type,
//! changed-attribute count, nested-item count, the changed attributes
//! as (key, type-tag, value) triples, and one level of nested records
//! of the same shape. Two interchangeable, functionally equivalent
//! formats are provided:
//!
//! - [`text`] — tokens joined by a reserved separator byte.
//! - [`binary`] — a length-prefixed typed record with a magic header.
//!
//! Records are constructed fresh per poll, serialized, handed off, and
//! never retained.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod binary;
pub mod fmt;
pub mod record;
pub mod text;

pub use record::{RawAttribute, StateRecord};

use vigil_core::WireError;

/// Which wire format a network sender encodes with.
///
/// Selected per sender at configuration time; both formats carry the
/// same record shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WireFormat {
    /// Separator-delimited text (see [`text`]).
    #[default]
    Text,
    /// Length-prefixed typed records (see [`binary`]).
    Binary,
}

impl WireFormat {
    /// Encode a record in this format.
    pub fn encode(self, record: &StateRecord) -> Result<Vec<u8>, WireError> {
        match self {
            Self::Text => text::encode(record),
            Self::Binary => binary::encode(record),
        }
    }

    /// Decode a record in this format.
    pub fn decode(self, bytes: &[u8]) -> Result<StateRecord, WireError> {
        match self {
            Self::Text => text::decode(bytes),
            Self::Binary => binary::decode(bytes),
        }
    }
}
