//! Integration test: loopback datagram delivery.
//!
//! Binds a receiver on an ephemeral loopback port, sends through
//! [`UdpTransport`], and verifies the payload arrives intact — both
//! raw and compressed, with the marker byte decoded on the receiving
//! side.

use std::net::{Ipv4Addr, UdpSocket};
use std::time::Duration;

use vigil_net::{decode_payload, encode_payload, UdpTransport};

fn loopback_receiver() -> (UdpSocket, u16) {
    let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
    socket
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let port = socket.local_addr().unwrap().port();
    (socket, port)
}

#[test]
fn raw_payload_arrives_on_loopback() {
    let (receiver, port) = loopback_receiver();
    let transport = UdpTransport::new(port, &["127.0.0.1".to_string()]).unwrap();

    let message = b"7\x1f1\x1f0\x1f0\x1f\x1f\x1f";
    let payload = encode_payload(message, false).unwrap();
    let report = transport.send(&payload).unwrap();
    assert_eq!(report.delivered, 1);
    assert!(report.failures.is_empty());

    let mut buf = [0u8; 1024];
    let (n, _) = receiver.recv_from(&mut buf).unwrap();
    assert_eq!(decode_payload(&buf[..n]).unwrap(), message);
}

#[test]
fn compressed_payload_self_identifies() {
    let (receiver, port) = loopback_receiver();
    let transport = UdpTransport::new(port, &["127.0.0.1".to_string()]).unwrap();

    // Compressible message: a long run of repeated attribute text.
    let message = vec![b'a'; 8192];
    let payload = encode_payload(&message, true).unwrap();
    assert!(payload.len() < message.len());
    transport.send(&payload).unwrap();

    let mut buf = [0u8; 16384];
    let (n, _) = receiver.recv_from(&mut buf).unwrap();
    // The receiver needs no configuration: the marker byte says it all.
    assert_eq!(decode_payload(&buf[..n]).unwrap(), message);
}

#[test]
fn one_datagram_per_send_never_per_attribute() {
    let (receiver, port) = loopback_receiver();
    let transport = UdpTransport::new(port, &["127.0.0.1".to_string()]).unwrap();

    // A record with many attributes still goes out as one datagram.
    let mut message = Vec::new();
    for i in 0..50 {
        message.extend_from_slice(format!("attr_{i}\x1f2\x1f{i}\x1f").as_bytes());
    }
    let payload = encode_payload(&message, false).unwrap();
    let report = transport.send(&payload).unwrap();
    assert_eq!(report.delivered, 1);

    let mut buf = [0u8; 16384];
    let (n, _) = receiver.recv_from(&mut buf).unwrap();
    assert_eq!(decode_payload(&buf[..n]).unwrap(), message);

    // Exactly one: the next read must time out empty.
    receiver
        .set_read_timeout(Some(Duration::from_millis(200)))
        .unwrap();
    assert!(receiver.recv_from(&mut buf).is_err());
}
