//! Unified error type for the client firmware.
//!
//! Per-request failures are [`DispatchError`](crate::app::dispatcher::DispatchError)s
//! and never leave the session. What ends up here is fatal to whatever
//! was running: a transport that failed, a rejected handshake, storage or
//! configuration that cannot be used.

use core::fmt;

use crate::app::ports::{PeripheralError, StorageError};
use crate::config::ConfigError;
use crate::link::transport::TransportError;

/// Every fallible top-level operation funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Persistent storage could not be read or written.
    Storage(StorageError),
    /// A peripheral could not be set up.
    Peripheral(PeripheralError),
    /// The transport failed outside an orderly close.
    Transport(TransportError),
    /// Configuration is invalid.
    Config(ConfigError),
    /// The server answered the greeting with something other than the echo.
    HandshakeRejected,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Peripheral(e) => write!(f, "peripheral: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::HandshakeRejected => write!(f, "handshake rejected"),
        }
    }
}

impl core::error::Error for Error {}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<PeripheralError> for Error {
    fn from(e: PeripheralError) -> Self {
        Self::Peripheral(e)
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
