//! TCP transport: one stream per device, newline-framed messages.
//!
//! Reads are decoded by [`LineDecoder`]; a single read may complete
//! several lines, which are queued and handed out one per
//! `next_event`. Outbound messages get the `\n` terminator appended.
//!
//! ```text
//!  connect ──▶ Connected ──▶ Message* ──▶ Closed(Closed | Aborted | TimedOut)
//! ```
//!
//! Once closed the transport stays closed: every later `next_event`
//! repeats the close reason and `send` fails with `NotConnected`.

use core::time::Duration;
use std::collections::VecDeque;
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Instant;

use log::{debug, info, warn};

use crate::link::codec::{LineDecoder, encode_line};
use crate::link::transport::{CloseReason, Message, Transport, TransportError, TransportEvent};

const POLL_INTERVAL: Duration = Duration::from_millis(1);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_BUF_SIZE: usize = 512;

pub struct TcpTransport {
    stream: TcpStream,
    decoder: LineDecoder,
    ready: VecDeque<Message>,
    idle_timeout: Option<Duration>,
    last_rx: Instant,
    announced: bool,
    closed: Option<CloseReason>,
}

impl TcpTransport {
    /// Open the stream. `idle_timeout` of `None` waits forever.
    pub fn connect(
        server: SocketAddr,
        idle_timeout: Option<Duration>,
    ) -> Result<Self, TransportError> {
        let stream = TcpStream::connect_timeout(&server, CONNECT_TIMEOUT).map_err(|e| {
            warn!("TCP: connect {} failed: {}", server, e);
            TransportError::Setup
        })?;
        Self::from_stream(stream, idle_timeout)
    }

    /// Wrap an already connected stream.
    pub fn from_stream(
        stream: TcpStream,
        idle_timeout: Option<Duration>,
    ) -> Result<Self, TransportError> {
        stream.set_nodelay(true)?;
        stream.set_nonblocking(true)?;
        info!("TCP: connected to {}", stream.peer_addr()?);

        Ok(Self {
            stream,
            decoder: LineDecoder::new(),
            ready: VecDeque::new(),
            idle_timeout,
            last_rx: Instant::now(),
            announced: false,
            closed: None,
        })
    }

    fn close(&mut self, reason: CloseReason) -> TransportEvent {
        let _ = self.stream.shutdown(Shutdown::Both);
        self.closed = Some(reason);
        self.ready.clear();
        self.decoder.reset();
        TransportEvent::Closed(reason)
    }

    fn idle_expired(&self) -> bool {
        self.idle_timeout
            .is_some_and(|limit| self.last_rx.elapsed() >= limit)
    }
}

impl Transport for TcpTransport {
    async fn next_event(&mut self) -> Result<TransportEvent, TransportError> {
        if let Some(reason) = self.closed {
            return Ok(TransportEvent::Closed(reason));
        }
        if !self.announced {
            self.announced = true;
            self.last_rx = Instant::now();
            return Ok(TransportEvent::Connected);
        }

        let mut buf = [0u8; READ_BUF_SIZE];
        loop {
            if let Some(line) = self.ready.pop_front() {
                return Ok(TransportEvent::Message(line));
            }

            match self.stream.read(&mut buf) {
                Ok(0) => return Ok(self.close(CloseReason::Closed)),
                Ok(n) => {
                    self.last_rx = Instant::now();
                    self.decoder.feed(&buf[..n], |line| self.ready.push_back(line));
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    if self.idle_expired() {
                        debug!("TCP: idle for {:?}", self.idle_timeout);
                        return Ok(self.close(CloseReason::TimedOut));
                    }
                    async_io_mini::Timer::after(POLL_INTERVAL).await;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::ConnectionReset
                            | ErrorKind::ConnectionAborted
                            | ErrorKind::BrokenPipe
                    ) =>
                {
                    warn!("TCP: {}", e);
                    return Ok(self.close(CloseReason::Aborted));
                }
                Err(e) => {
                    warn!("TCP: read failed: {}", e);
                    return Err(e.into());
                }
            }
        }
    }

    async fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        if self.closed.is_some() {
            return Err(TransportError::NotConnected);
        }
        let framed = encode_line(data).ok_or(TransportError::MessageTooLarge)?;

        let mut rest = framed.as_slice();
        while !rest.is_empty() {
            match self.stream.write(rest) {
                Ok(0) => return Err(TransportError::NotConnected),
                Ok(n) => rest = &rest[n..],
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    async_io_mini::Timer::after(POLL_INTERVAL).await;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    warn!("TCP: write failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }
}
