//! The tagged attribute value model.
//!
//! Subjects expose a dynamically-typed attribute bag. The observation
//! core never interprets values beyond the closed set modeled here:
//! booleans, numbers, text, and opaque references it tracks by
//! identity only.

use crate::id::OpaqueHandle;
use std::fmt;

/// A value read from a subject's attribute bag.
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// A boolean.
    Bool(bool),
    /// A double-precision number. The host's date/time values reduce
    /// to this representation before they reach the observation layer.
    Number(f64),
    /// A text string.
    Text(String),
    /// A reference the core cannot dereference: a scripting table,
    /// foreign userdata, a function, or some other handle. Tracked by
    /// [`OpaqueHandle`] identity; content changes are invisible,
    /// identity changes are diffable.
    Opaque {
        /// What kind of reference this is.
        kind: OpaqueKind,
        /// Stable identity token for the referent.
        handle: OpaqueHandle,
    },
}

impl AttrValue {
    /// The wire type tag this value encodes under.
    ///
    /// Opaque references encode as [`AttrKind::Text`] (a prefixed
    /// identity token), matching the residual-kind rule of the wire
    /// protocol.
    pub fn kind(&self) -> AttrKind {
        match self {
            Self::Bool(_) => AttrKind::Bool,
            Self::Number(_) => AttrKind::Number,
            Self::Text(_) | Self::Opaque { .. } => AttrKind::Text,
        }
    }
}

/// The kind of an opaque reference.
///
/// Distinguished at encode time by a fixed text prefix so a decoder
/// can at least classify values it cannot resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpaqueKind {
    /// A scripting-language table.
    Table,
    /// Foreign userdata.
    UserData,
    /// A function reference.
    Function,
    /// Anything else.
    Other,
}

impl OpaqueKind {
    /// The fixed prefix prepended to this kind's identity token.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Table => "ref(table):",
            Self::UserData => "ref(userdata):",
            Self::Function => "ref(function):",
            Self::Other => "ref(other):",
        }
    }
}

/// Wire type tag for an encoded attribute.
///
/// Codes are stable and shared by the text and binary codecs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttrKind {
    /// Boolean, encoded as `0`/`1` in the text format.
    Bool,
    /// Double-precision number.
    Number,
    /// Text, including the prefixed tokens of opaque references.
    Text,
    /// Date/time. Never emitted by the encoder (the host reduces these
    /// to numbers first) but accepted by decoders as [`AttrKind::Number`].
    DateTime,
}

impl AttrKind {
    /// Stable wire code for this tag.
    pub fn code(self) -> u8 {
        match self {
            Self::Bool => 1,
            Self::Number => 2,
            Self::Text => 3,
            Self::DateTime => 4,
        }
    }

    /// Decode a wire code; `None` for codes outside the known set.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            1 => Self::Bool,
            2 => Self::Number,
            3 => Self::Text,
            4 => Self::DateTime,
            _ => return None,
        })
    }
}

impl fmt::Display for AttrKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "Bool",
            Self::Number => "Number",
            Self::Text => "Text",
            Self::DateTime => "DateTime",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_kinds() {
        assert_eq!(AttrValue::Bool(true).kind(), AttrKind::Bool);
        assert_eq!(AttrValue::Number(1.5).kind(), AttrKind::Number);
        assert_eq!(AttrValue::Text("x".into()).kind(), AttrKind::Text);
        let opaque = AttrValue::Opaque {
            kind: OpaqueKind::Function,
            handle: OpaqueHandle::next(),
        };
        assert_eq!(opaque.kind(), AttrKind::Text);
    }

    #[test]
    fn attr_kind_codes_round_trip() {
        for code in 1..=4u8 {
            let kind = AttrKind::from_code(code).unwrap();
            assert_eq!(kind.code(), code);
        }
        assert_eq!(AttrKind::from_code(0), None);
        assert_eq!(AttrKind::from_code(5), None);
    }

    #[test]
    fn opaque_prefixes_are_distinct() {
        let prefixes = [
            OpaqueKind::Table.prefix(),
            OpaqueKind::UserData.prefix(),
            OpaqueKind::Function.prefix(),
            OpaqueKind::Other.prefix(),
        ];
        for (i, a) in prefixes.iter().enumerate() {
            for b in &prefixes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
