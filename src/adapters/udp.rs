//! UDP transport: one protocol message per datagram.
//!
//! The socket is bound to the client port and connected to the server
//! endpoint, so datagrams from anyone else are filtered by the stack.
//! UDP has no connection, so the transport reports `Connected` as soon as
//! it is polled and never reports `Closed`.
//!
//! The socket runs non-blocking and is polled on a 1 ms `async-io-mini`
//! timer, which keeps the executor free between datagrams.

use core::time::Duration;
use std::io::ErrorKind;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use log::{debug, info, warn};

use crate::link::transport::{Message, Transport, TransportError, TransportEvent};
use crate::protocol::MAX_MESSAGE_LEN;

const POLL_INTERVAL: Duration = Duration::from_millis(1);

pub struct UdpTransport {
    socket: UdpSocket,
    announced: bool,
}

impl UdpTransport {
    /// Bind `local_port` (0 picks an ephemeral port) and connect to `server`.
    pub fn connect(local_port: u16, server: SocketAddr) -> Result<Self, TransportError> {
        let local: SocketAddr = if server.is_ipv6() {
            (Ipv6Addr::UNSPECIFIED, local_port).into()
        } else {
            (Ipv4Addr::UNSPECIFIED, local_port).into()
        };

        let socket = UdpSocket::bind(local).map_err(|e| {
            warn!("UDP: bind {} failed: {}", local, e);
            TransportError::Setup
        })?;
        socket.connect(server).map_err(|e| {
            warn!("UDP: connect {} failed: {}", server, e);
            TransportError::Setup
        })?;
        socket.set_nonblocking(true)?;

        info!("UDP: {} -> {}", socket.local_addr()?, server);
        Ok(Self {
            socket,
            announced: false,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.socket.local_addr()?)
    }
}

impl Transport for UdpTransport {
    async fn next_event(&mut self) -> Result<TransportEvent, TransportError> {
        if !self.announced {
            self.announced = true;
            return Ok(TransportEvent::Connected);
        }

        // One spare byte detects oversized datagrams.
        let mut buf = [0u8; MAX_MESSAGE_LEN + 1];
        loop {
            match self.socket.recv(&mut buf) {
                Ok(n) if n > MAX_MESSAGE_LEN => {
                    warn!("UDP: datagram exceeds {} bytes, dropping", MAX_MESSAGE_LEN);
                }
                Ok(n) => {
                    let mut message = Message::new();
                    // n <= MAX_MESSAGE_LEN, always fits.
                    let _ = message.extend_from_slice(&buf[..n]);
                    return Ok(TransportEvent::Message(message));
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    async_io_mini::Timer::after(POLL_INTERVAL).await;
                }
                // ICMP port unreachable from an earlier send; the server may
                // simply not be up yet.
                Err(e) if e.kind() == ErrorKind::ConnectionRefused => {
                    debug!("UDP: server unreachable");
                    async_io_mini::Timer::after(POLL_INTERVAL).await;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    warn!("UDP: recv failed: {}", e);
                    return Err(e.into());
                }
            }
        }
    }

    async fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        if data.len() > MAX_MESSAGE_LEN {
            return Err(TransportError::MessageTooLarge);
        }
        loop {
            match self.socket.send(data) {
                Ok(_) => return Ok(()),
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    async_io_mini::Timer::after(POLL_INTERVAL).await;
                }
                Err(e) if e.kind() == ErrorKind::ConnectionRefused => {
                    debug!("UDP: server unreachable, datagram lost");
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    warn!("UDP: send failed: {}", e);
                    return Err(e.into());
                }
            }
        }
    }
}
