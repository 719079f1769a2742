//! Transport abstraction for any message-oriented link to the server.
//!
//! Concrete implementations:
//! - UDP datagrams (6LoWPAN / IPv6)
//! - TCP stream, newline framed
//! - `embassy-sync` channels fed by an I/O task
//!
//! The session is generic over `Transport`, so adding a new transport
//! requires zero changes to the protocol logic. Both methods are
//! suspension points: nothing else runs in the session while one of them
//! is pending.

use core::fmt;

use crate::protocol::MAX_MESSAGE_LEN;

/// One inbound or outbound message.
pub type Message = heapless::Vec<u8, MAX_MESSAGE_LEN>;

/// Why the link went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Orderly close by the peer.
    Closed,
    /// Connection reset or otherwise torn down.
    Aborted,
    /// No traffic within the configured idle timeout.
    TimedOut,
}

impl fmt::Display for CloseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Aborted => write!(f, "aborted"),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Something the session has to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The link is up and the greeting can be sent.
    Connected,
    /// One complete inbound message.
    Message(Message),
    /// The link is gone. Terminal.
    Closed(CloseReason),
}

/// Transport failures that are not an orderly lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Socket creation, bind or connect failed.
    Setup,
    /// Outbound message exceeds [`MAX_MESSAGE_LEN`].
    MessageTooLarge,
    /// The link is not (or no longer) connected.
    NotConnected,
    /// Generic I/O failure.
    Io,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup => write!(f, "transport setup failed"),
            Self::MessageTooLarge => write!(f, "message exceeds {MAX_MESSAGE_LEN} bytes"),
            Self::NotConnected => write!(f, "not connected"),
            Self::Io => write!(f, "I/O error"),
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match e.kind() {
            ErrorKind::NotConnected
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::BrokenPipe => Self::NotConnected,
            ErrorKind::AddrInUse | ErrorKind::AddrNotAvailable | ErrorKind::ConnectionRefused => {
                Self::Setup
            }
            _ => Self::Io,
        }
    }
}

/// Message-oriented link.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Suspend until the next message or lifecycle event.
    async fn next_event(&mut self) -> Result<TransportEvent, TransportError>;

    /// Send one message, resolving once it has been handed to the link.
    async fn send(&mut self, data: &[u8]) -> Result<(), TransportError>;
}
