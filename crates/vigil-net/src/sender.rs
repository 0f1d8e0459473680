//! UDP destination resolution and datagram sends.
//!
//! A transport owns one unbound-port UDP socket and a fixed
//! destination list resolved at construction. Sends are non-blocking:
//! a full OS buffer drops the datagram with a warning instead of
//! stalling the simulation thread.

use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs, UdpSocket};

use tracing::warn;
use vigil_core::TransportError;

/// Sentinel host string selecting subnet broadcast.
pub const BROADCAST_HOST: &str = "broadcast";

/// Maximum UDP payload this transport will attempt to send, in bytes.
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// One resolved destination endpoint.
#[derive(Clone, Debug)]
struct Destination {
    /// The host string as configured, for diagnostics.
    label: String,
    addr: SocketAddr,
}

/// Outcome of one [`UdpTransport::send`] fan-out.
#[derive(Clone, Debug, Default)]
pub struct SendReport {
    /// How many destinations accepted the datagram.
    pub delivered: usize,
    /// Per-destination failures, in destination order. Never retried.
    pub failures: Vec<TransportError>,
}

/// Fire-and-forget UDP sender with a fixed destination list.
///
/// Destination resolution happens once, at construction: the
/// [`BROADCAST_HOST`] sentinel maps to the subnet broadcast address
/// (and enables `SO_BROADCAST` on the socket); every other non-empty
/// host string is resolved as a unicast/multicast target. Hosts that
/// fail to resolve are dropped with a warning — the transport is still
/// created with whatever destinations remain.
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    destinations: Vec<Destination>,
}

impl UdpTransport {
    /// Create a transport sending to `hosts` on `port`.
    pub fn new(port: u16, hosts: &[String]) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).map_err(|e| {
            TransportError::SocketUnavailable {
                reason: e.to_string(),
            }
        })?;
        socket
            .set_nonblocking(true)
            .map_err(|e| TransportError::SocketUnavailable {
                reason: e.to_string(),
            })?;

        let mut destinations = Vec::new();
        for host in hosts {
            if host.is_empty() {
                continue;
            }
            if host == BROADCAST_HOST {
                socket
                    .set_broadcast(true)
                    .map_err(|e| TransportError::SocketUnavailable {
                        reason: e.to_string(),
                    })?;
                destinations.push(Destination {
                    label: host.clone(),
                    addr: SocketAddr::from((Ipv4Addr::BROADCAST, port)),
                });
                continue;
            }
            match resolve(host, port) {
                Ok(addr) => destinations.push(Destination {
                    label: host.clone(),
                    addr,
                }),
                Err(e) => warn!(host = %host, "dropping unresolvable destination: {e}"),
            }
        }

        Ok(Self {
            socket,
            destinations,
        })
    }

    /// Number of destinations the transport will send to.
    pub fn destination_count(&self) -> usize {
        self.destinations.len()
    }

    /// Send one datagram to every destination independently.
    ///
    /// One payload, one send per destination, regardless of how many
    /// attributes the message carries. A failure for one destination
    /// is recorded in the report and does not affect the others.
    /// Returns `Err` only for payloads exceeding [`MAX_DATAGRAM_SIZE`],
    /// which cannot be sent anywhere.
    pub fn send(&self, payload: &[u8]) -> Result<SendReport, TransportError> {
        if payload.len() > MAX_DATAGRAM_SIZE {
            return Err(TransportError::PayloadTooLarge {
                len: payload.len(),
                max: MAX_DATAGRAM_SIZE,
            });
        }

        let mut report = SendReport::default();
        for dest in &self.destinations {
            match self.socket.send_to(payload, dest.addr) {
                Ok(_) => report.delivered += 1,
                Err(e) => {
                    // WouldBlock means the OS buffer is full: drop,
                    // don't stall the simulation thread.
                    warn!(host = %dest.label, "datagram send failed: {e}");
                    report.failures.push(TransportError::SendFailed {
                        host: dest.label.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }
}

fn resolve(host: &str, port: u16) -> Result<SocketAddr, TransportError> {
    (host, port)
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .ok_or_else(|| TransportError::InvalidHost {
            host: host.to_string(),
        })
}
