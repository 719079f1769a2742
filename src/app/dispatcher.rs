//! Request dispatcher, the hexagonal core.
//!
//! ```text
//!  bytes ──▶ tokenize ──▶ Request::parse ──▶ Action ──▶ I2cPort / GpioPort
//!                              │                 │
//!                         (not for us)           └──▶ Identity ──▶ StoragePort
//!                              ▼
//!                          Discarded
//! ```
//!
//! Every step either succeeds or short-circuits with a [`DispatchError`];
//! there is no partially resolved request. The token sequence is owned by
//! the dispatch call and dropped on every exit path.

use core::fmt;

use log::{debug, info, warn};

use crate::protocol::name::DeviceName;
use crate::protocol::request::{Request, RequestError};
use crate::protocol::tokenizer::tokenize;
use crate::protocol::variant::{ReplyTag, Variant};

use super::actions::Action;
use super::identity::Identity;
use super::ports::{GpioPort, I2cPort, PeripheralError, StorageError, StoragePort};

/// Result of a successfully dispatched request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Addressed to another device; nothing happened.
    Discarded,
    /// Well-formed, but no action is defined for it.
    Ignored,
    /// The action ran and produces no reply.
    Executed(Action),
    /// The action ran; `payload` goes back to the server.
    Reply(String),
    /// The device name was replaced and persisted.
    Renamed { from: DeviceName, to: DeviceName },
}

/// Why a request was dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Malformed request; nothing was executed.
    Request(RequestError),
    /// The peripheral call failed.
    Peripheral(PeripheralError),
    /// Persisting a new name failed; the old name stays.
    Storage(StorageError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(e) => write!(f, "malformed request: {e}"),
            Self::Peripheral(e) => write!(f, "peripheral: {e}"),
            Self::Storage(e) => write!(f, "storage: {e}"),
        }
    }
}

impl From<RequestError> for DispatchError {
    fn from(e: RequestError) -> Self {
        Self::Request(e)
    }
}

impl From<PeripheralError> for DispatchError {
    fn from(e: PeripheralError) -> Self {
        Self::Peripheral(e)
    }
}

impl From<StorageError> for DispatchError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

/// Transport-agnostic dispatcher, parameterised by dialect.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    variant: Variant,
    reply_tag: ReplyTag,
}

impl Dispatcher {
    pub fn new(variant: Variant, reply_tag: ReplyTag) -> Self {
        Self { variant, reply_tag }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Decode, tokenize and dispatch one raw message.
    pub fn dispatch_message(
        &self,
        message: &[u8],
        identity: &mut Identity,
        hw: &mut (impl I2cPort + GpioPort),
        storage: &mut impl StoragePort,
    ) -> Result<Outcome, DispatchError> {
        let text = core::str::from_utf8(message).map_err(|_| RequestError::NotUtf8)?;
        debug!("Received: {}", text);
        let tokens = tokenize(text);
        self.dispatch(&tokens, identity, hw, storage)
    }

    /// Dispatch an already tokenized request.
    pub fn dispatch(
        &self,
        tokens: &[String],
        identity: &mut Identity,
        hw: &mut (impl I2cPort + GpioPort),
        storage: &mut impl StoragePort,
    ) -> Result<Outcome, DispatchError> {
        let Some(request) = Request::parse(tokens, self.variant, identity.name())? else {
            return Ok(Outcome::Discarded);
        };
        match Action::from_request(request)? {
            Some(action) => self.execute(action, identity, hw, storage),
            None => Ok(Outcome::Ignored),
        }
    }

    /// Carry out a resolved action.
    pub fn execute(
        &self,
        action: Action,
        identity: &mut Identity,
        hw: &mut (impl I2cPort + GpioPort),
        storage: &mut impl StoragePort,
    ) -> Result<Outcome, DispatchError> {
        match &action {
            Action::I2cInit => hw.init()?,
            Action::I2cRelease => hw.release()?,
            Action::I2cWrite { address, value } => hw.write_byte(*address, *value)?,
            Action::I2cRead { address } => {
                let value = hw.read_byte(*address)?;
                let payload = self.variant.read_reply(value, self.reply_tag);
                debug!("Sending data: {}", payload);
                return Ok(Outcome::Reply(payload));
            }
            Action::GpioWrite { pin, high } => hw.set(*pin, *high)?,
            Action::SetDeviceName(to) => {
                let from = identity.replace(to.clone(), storage).inspect_err(|e| {
                    warn!("Device name not changed, flash write failed: {}", e);
                })?;
                info!("Device name changed: {} -> {}", from, to);
                return Ok(Outcome::Renamed {
                    from,
                    to: to.clone(),
                });
            }
        }
        Ok(Outcome::Executed(action))
    }
}
