//! UDP and TCP transports over loopback sockets.

use std::io::{Read, Write};
use std::net::{TcpListener, UdpSocket};
use std::time::Duration;

use futures_lite::future::block_on;

use clickerlink::adapters::tcp::TcpTransport;
use clickerlink::adapters::udp::UdpTransport;
use clickerlink::link::transport::{CloseReason, Transport, TransportEvent};

use crate::mock_hw::msg;

#[test]
fn udp_datagram_roundtrip() {
    let server = UdpSocket::bind("127.0.0.1:0").unwrap();
    server
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let mut transport = UdpTransport::connect(0, server.local_addr().unwrap()).unwrap();

    assert_eq!(block_on(transport.next_event()), Ok(TransportEvent::Connected));

    block_on(transport.send(b"Server/HELLO/Clicker")).unwrap();
    let mut buf = [0u8; 64];
    let (n, client) = server.recv_from(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"Server/HELLO/Clicker");

    server.send_to(b"Clicker/HELLO", client).unwrap();
    assert_eq!(block_on(transport.next_event()), Ok(msg("Clicker/HELLO")));
}

#[test]
fn tcp_lines_and_orderly_close() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let mut transport = TcpTransport::connect(listener.local_addr().unwrap(), None).unwrap();
    let (mut peer, _) = listener.accept().unwrap();

    assert_eq!(block_on(transport.next_event()), Ok(TransportEvent::Connected));

    block_on(transport.send(b"HELLO/Clicker")).unwrap();
    let mut buf = [0u8; 14];
    peer.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"HELLO/Clicker\n");

    peer.write_all(b"HELLO\r\nI2C/INIT\n").unwrap();
    assert_eq!(block_on(transport.next_event()), Ok(msg("HELLO")));
    assert_eq!(block_on(transport.next_event()), Ok(msg("I2C/INIT")));

    drop(peer);
    let closed = TransportEvent::Closed(CloseReason::Closed);
    assert_eq!(block_on(transport.next_event()), Ok(closed.clone()));
    // Terminal.
    assert_eq!(block_on(transport.next_event()), Ok(closed));
    assert!(block_on(transport.send(b"late")).is_err());
}

#[test]
fn tcp_idle_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let mut transport = TcpTransport::connect(
        listener.local_addr().unwrap(),
        Some(Duration::from_millis(50)),
    )
    .unwrap();
    let (_peer, _) = listener.accept().unwrap();

    assert_eq!(block_on(transport.next_event()), Ok(TransportEvent::Connected));
    assert_eq!(
        block_on(transport.next_event()),
        Ok(TransportEvent::Closed(CloseReason::TimedOut))
    );
}
