//! Best-effort UDP datagram transport for Vigil observation messages.
//!
//! One poll of a subject with a network observer produces exactly one
//! datagram per destination: push-and-forget telemetry, not a
//! consistency protocol. There is no flow control, no delivery
//! confirmation, and no retry; failed writes are reported through the
//! warning channel and dropped.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod compress;
pub mod sender;

pub use compress::{decode_payload, encode_payload};
pub use sender::{SendReport, UdpTransport, BROADCAST_HOST, MAX_DATAGRAM_SIZE};
