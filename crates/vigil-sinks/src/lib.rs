//! Observation sink adapters for Vigil subjects.
//!
//! A sink is the delivery end of one observer: it receives the state
//! record built for a poll and renders it somewhere — a log file, an
//! in-memory table, a console screen, a numeric chart, a state-machine
//! tracker, or a UDP datagram stream. Sinks declare whether they want
//! the full snapshot or only the changed attributes, and the registry
//! builds both once per poll and hands each sink the one it asked for.
//!
//! Sink failures are contained: a failed delivery is logged by the
//! caller and never aborts the remaining observers of the tick.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod factory;
pub mod graphic;
pub mod logfile;
pub mod statemachine;
pub mod table;
pub mod textscreen;
pub mod udp;

pub use config::SinkConfig;
pub use factory::build_sink;
pub use graphic::{GraphicSink, XSource};
pub use logfile::LogFileSink;
pub use statemachine::StateMachineSink;
pub use table::TableSink;
pub use textscreen::TextScreenSink;
pub use udp::UdpSink;

use vigil_core::{ObserverType, SinkError};
use vigil_wire::StateRecord;

/// Which view of a poll a sink consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkMode {
    /// The full snapshot, every subscribed attribute every poll.
    Full,
    /// Only the attributes whose serialized value changed since the
    /// last poll. Empty on a quiet tick.
    Diff,
}

/// The delivery end of one observer.
///
/// `accept` is called once per poll with the record matching the
/// sink's [`mode`](Sink::mode) and the simulation time of the poll.
/// Implementations must never block the polling thread on slow
/// consumers; hand off or drop instead.
pub trait Sink: Send {
    /// The observer kind this sink implements.
    fn observer_type(&self) -> ObserverType;

    /// Whether this sink consumes full snapshots or diffs.
    fn mode(&self) -> SinkMode;

    /// Deliver one poll's record.
    fn accept(&mut self, time: f64, record: &StateRecord) -> Result<(), SinkError>;

    /// Release the sink's backing resources. Further `accept` calls
    /// after a successful close return [`SinkError::Closed`].
    fn close(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}
