//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Dispatcher / Session (domain)
//! ```
//!
//! Driven adapters (I2C bus, GPIO pins, flash, event sinks) implement these
//! traits. The [`Dispatcher`](super::dispatcher::Dispatcher) and the
//! [`Session`](crate::link::session::Session) consume them via generics, so
//! the domain core never touches hardware directly.
//!
//! Peripheral ports are fire-and-forget from the protocol's point of view:
//! a failure is logged and ends the current request, nothing more.

use core::fmt;

use crate::protocol::command::Pin;

// ───────────────────────────────────────────────────────────────
// I2C port (driven adapter: domain → bus master)
// ───────────────────────────────────────────────────────────────

/// Single-byte I2C master operations. Addresses are 7-bit.
pub trait I2cPort {
    /// Bring the bus up.
    fn init(&mut self) -> Result<(), PeripheralError>;

    /// Release the bus.
    fn release(&mut self) -> Result<(), PeripheralError>;

    /// Write one byte to the slave at `address`.
    fn write_byte(&mut self, address: u8, value: u8) -> Result<(), PeripheralError>;

    /// Read one byte from the slave at `address`.
    fn read_byte(&mut self, address: u8) -> Result<u8, PeripheralError>;
}

// ───────────────────────────────────────────────────────────────
// GPIO port (driven adapter: domain → output pins)
// ───────────────────────────────────────────────────────────────

/// Digital outputs addressed by logical [`Pin`].
pub trait GpioPort {
    /// Drive `pin` high (`true`) or low (`false`).
    fn set(&mut self, pin: Pin, high: bool) -> Result<(), PeripheralError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ flash)
// ───────────────────────────────────────────────────────────────

/// Byte-addressable persistent storage.
///
/// `write` MUST be all-or-nothing: either every byte of `data` lands or
/// the previous contents are left intact.
pub trait StoragePort {
    /// Read up to `buf.len()` bytes starting at `offset`.
    /// Returns the number of bytes copied into `buf`.
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write `data` starting at `offset`.
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`I2cPort`] and [`GpioPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeripheralError {
    /// The bus has not been initialised (or was released).
    NotInitialised,
    /// The bus transaction failed (NACK, arbitration loss, timeout).
    Bus,
    /// The output pin could not be driven.
    Pin,
}

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Access falls outside the storage area.
    OutOfRange,
    /// Generic I/O error from the flash backend.
    IoError,
    /// The data was refused before reaching the backend.
    InvalidData,
}

impl fmt::Display for PeripheralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialised => write!(f, "bus not initialised"),
            Self::Bus => write!(f, "bus transaction failed"),
            Self::Pin => write!(f, "pin write failed"),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "access out of range"),
            Self::IoError => write!(f, "I/O error"),
            Self::InvalidData => write!(f, "invalid data"),
        }
    }
}
