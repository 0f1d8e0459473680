//! Datagram sender sink.
//!
//! Encodes each non-quiet diff in the configured wire format, wraps it
//! in the self-identifying compression envelope, and hands it to the
//! UDP transport: one datagram per destination per poll. A sender
//! configured without a port is inert — it accepts records and
//! discards them, so the observer can be created, polled, and killed
//! uniformly.

use tracing::debug;

use vigil_core::{ObserverType, SinkError};
use vigil_net::{encode_payload, UdpTransport};
use vigil_wire::{StateRecord, WireFormat};

use crate::{Sink, SinkMode};

/// Push-and-forget network sender for observation records.
pub struct UdpSink {
    format: WireFormat,
    compress: bool,
    visible: bool,
    transport: Option<UdpTransport>,
    closed: bool,
}

impl UdpSink {
    /// Build a sender transmitting through `transport`.
    pub fn new(transport: UdpTransport, format: WireFormat, compress: bool, visible: bool) -> Self {
        Self {
            format,
            compress,
            visible,
            transport: Some(transport),
            closed: false,
        }
    }

    /// Build an inert sender: no port was configured, nothing is ever
    /// transmitted.
    pub fn inert(format: WireFormat, compress: bool, visible: bool) -> Self {
        Self {
            format,
            compress,
            visible,
            transport: None,
            closed: false,
        }
    }

    /// Whether this sender was left without a transport.
    pub fn is_inert(&self) -> bool {
        self.transport.is_none()
    }
}

impl Sink for UdpSink {
    fn observer_type(&self) -> ObserverType {
        ObserverType::UdpSender
    }

    fn mode(&self) -> SinkMode {
        SinkMode::Diff
    }

    fn accept(&mut self, _time: f64, record: &StateRecord) -> Result<(), SinkError> {
        if self.closed {
            return Err(SinkError::Closed);
        }
        if record.is_empty() {
            return Ok(());
        }
        let Some(transport) = &self.transport else {
            return Ok(());
        };

        let message = self.format.encode(record)?;
        let payload = encode_payload(&message, self.compress)?;
        let report = transport.send(&payload)?;

        if self.visible {
            debug!(
                subject = %record.id,
                bytes = payload.len(),
                delivered = report.delivered,
                failed = report.failures.len(),
                "datagram sent"
            );
        }
        // Partial delivery is acceptable; total failure is not.
        if report.delivered == 0 {
            if let Some(failure) = report.failures.into_iter().next() {
                return Err(failure.into());
            }
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.transport = None;
        self.closed = true;
        Ok(())
    }
}
