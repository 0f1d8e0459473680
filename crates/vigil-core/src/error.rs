//! Error types for the Vigil observation framework.
//!
//! One enum per subsystem: observation (registry/creation), wire
//! codec, network transport, and sink delivery. Configuration problems
//! with a documented fallback are not errors — they are reported
//! through the warning channel and the sink degrades.

use std::error::Error;
use std::fmt;

/// Errors from observer creation and registry operations.
///
/// These are the hard failures of the observation layer: creation is
/// aborted and no observer id is allocated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObserveError {
    /// An explicitly-subscribed attribute key is absent from the
    /// subject's full key set. Checked once, at observer-creation
    /// time, never per poll.
    AttributeNotFound {
        /// The missing key.
        key: String,
    },
    /// The integer observer-type code from the binding layer does not
    /// correspond to a known observer kind.
    UnknownObserverType {
        /// The offending code.
        code: i32,
    },
    /// A Graphic observer subscribed to an attribute whose current
    /// value is not numeric.
    NonNumericAttribute {
        /// The offending key.
        key: String,
    },
    /// A map or image observer was requested on a subject that has no
    /// shared cellular space to attach it to.
    NoSpatialCollaborator,
}

impl fmt::Display for ObserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttributeNotFound { key } => {
                write!(f, "attribute name '{key}' not found")
            }
            Self::UnknownObserverType { code } => {
                write!(
                    f,
                    "the code '{code}' does not correspond to a valid type of observer"
                )
            }
            Self::NonNumericAttribute { key } => {
                write!(f, "attribute '{key}' is not numeric")
            }
            Self::NoSpatialCollaborator => {
                write!(f, "subject has no cellular space to attach a spatial observer to")
            }
        }
    }
}

impl Error for ObserveError {}

/// Errors from encoding or decoding wire messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WireError {
    /// Input ended before the record was complete.
    Truncated,
    /// The binary header's magic bytes did not match.
    InvalidMagic {
        /// What was actually read.
        found: [u8; 4],
    },
    /// The message was produced by a newer format version.
    UnsupportedVersion {
        /// Version found in the header.
        version: u16,
    },
    /// An unknown subject-type or attribute-kind tag.
    UnknownTag {
        /// Which tag field was malformed.
        what: &'static str,
        /// The offending code.
        code: u8,
    },
    /// A declared count does not match the decoded repeated-field
    /// length, or a value exceeds its wire-format range.
    CountMismatch {
        /// Which count was inconsistent.
        what: &'static str,
        /// Count declared in the record header.
        declared: usize,
        /// Length actually decoded or encoded.
        actual: usize,
    },
    /// A key or text value contains the reserved separator byte, which
    /// the delimited format does not escape.
    ReservedByte {
        /// The offending key or value.
        token: String,
    },
    /// Anything else that makes the message unparseable.
    Malformed {
        /// Human-readable description.
        reason: String,
    },
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated => write!(f, "unexpected end of message"),
            Self::InvalidMagic { found } => {
                write!(
                    f,
                    "invalid magic: expected 'VOBS', got '{}'",
                    String::from_utf8_lossy(found)
                )
            }
            Self::UnsupportedVersion { version } => {
                write!(f, "unsupported wire version {version}")
            }
            Self::UnknownTag { what, code } => {
                write!(f, "unknown {what} tag {code}")
            }
            Self::CountMismatch {
                what,
                declared,
                actual,
            } => {
                write!(f, "{what} count mismatch: declared {declared}, actual {actual}")
            }
            Self::ReservedByte { token } => {
                write!(f, "token '{token}' contains the reserved separator byte")
            }
            Self::Malformed { reason } => write!(f, "malformed message: {reason}"),
        }
    }
}

impl Error for WireError {}

/// Errors from the datagram transport.
///
/// Transport failures are best-effort territory: the registry logs
/// them per observer and continues; nothing retries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportError {
    /// The sender was created without a port and is inert.
    NoPort,
    /// The UDP socket could not be created or configured.
    SocketUnavailable {
        /// Underlying OS error description.
        reason: String,
    },
    /// A destination host string could not be resolved.
    InvalidHost {
        /// The offending host string.
        host: String,
    },
    /// A datagram write failed for one destination.
    SendFailed {
        /// Destination the write was for.
        host: String,
        /// Underlying OS error description.
        reason: String,
    },
    /// The encoded payload exceeds the datagram size cap.
    PayloadTooLarge {
        /// Payload size in bytes.
        len: usize,
        /// The configured cap.
        max: usize,
    },
    /// Compressing or decompressing a payload failed.
    Compression {
        /// Underlying codec error description.
        reason: String,
    },
    /// A received payload's leading marker byte identifies neither a
    /// raw nor a compressed payload.
    UnknownMarker {
        /// The offending marker byte.
        marker: u8,
    },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPort => write!(f, "sender has no port and cannot transmit"),
            Self::SocketUnavailable { reason } => {
                write!(f, "socket unavailable: {reason}")
            }
            Self::InvalidHost { host } => write!(f, "invalid host '{host}'"),
            Self::SendFailed { host, reason } => {
                write!(f, "send to '{host}' failed: {reason}")
            }
            Self::PayloadTooLarge { len, max } => {
                write!(f, "payload of {len} bytes exceeds datagram cap of {max}")
            }
            Self::Compression { reason } => write!(f, "compression failed: {reason}"),
            Self::UnknownMarker { marker } => {
                write!(f, "unknown payload marker byte {marker:#04x}")
            }
        }
    }
}

impl Error for TransportError {}

/// Errors from delivering a record to a sink.
///
/// A sink failure never aborts the remaining observers' delivery for
/// the tick; the registry logs it and moves on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkError {
    /// An I/O operation on the sink's backing resource failed.
    Io {
        /// Underlying error description.
        reason: String,
    },
    /// The sink was already closed.
    Closed,
    /// The sink's hand-off queue is full; the record was dropped.
    QueueFull,
    /// The transport behind a network sink failed.
    Transport(TransportError),
    /// The record could not be encoded for transmission.
    Encode(WireError),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { reason } => write!(f, "sink i/o failed: {reason}"),
            Self::Closed => write!(f, "sink is closed"),
            Self::QueueFull => write!(f, "sink queue full, record dropped"),
            Self::Transport(e) => write!(f, "transport failed: {e}"),
            Self::Encode(e) => write!(f, "encode failed: {e}"),
        }
    }
}

impl Error for SinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Encode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransportError> for SinkError {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<WireError> for SinkError {
    fn from(e: WireError) -> Self {
        Self::Encode(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = ObserveError::AttributeNotFound { key: "soil".into() };
        assert_eq!(e.to_string(), "attribute name 'soil' not found");

        let e = WireError::CountMismatch {
            what: "attribute",
            declared: 3,
            actual: 2,
        };
        assert!(e.to_string().contains("declared 3"));

        let e = TransportError::PayloadTooLarge { len: 70000, max: 65507 };
        assert!(e.to_string().contains("70000"));
    }

    #[test]
    fn sink_error_sources_chain() {
        let e = SinkError::from(TransportError::NoPort);
        assert!(e.source().is_some());
        let e = SinkError::Closed;
        assert!(e.source().is_none());
    }
}
