//! Request header resolution.
//!
//! The leading fields of every message are consumed in a fixed order
//! before any bus-specific handling:
//!
//! 1. destination name (UDP only), compared against the identity and
//!    [`BROADCAST_NAME`]; a mismatch means "not for us"
//! 2. bus
//! 3. command
//!
//! Whatever is left is handed on as operands through a [`TokenCursor`].

use core::fmt;

use super::command::{Bus, Command};
use super::name::NameError;
use super::variant::Variant;
use super::BROADCAST_NAME;

/// Why a request could not be executed. Recoverable, per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Message had no fields at all.
    Empty,
    /// Message bytes were not valid UTF-8.
    NotUtf8,
    /// A required field was absent. Carries the field's role.
    MissingField(&'static str),
    UnknownBus(String),
    UnknownCommand(String),
    /// A numeric operand did not parse or was out of range.
    InvalidNumber { field: &'static str, token: String },
    InvalidName(NameError),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty request"),
            Self::NotUtf8 => write!(f, "request is not valid UTF-8"),
            Self::MissingField(field) => write!(f, "missing {field}"),
            Self::UnknownBus(t) => write!(f, "{t} unknown (expected bus)"),
            Self::UnknownCommand(t) => write!(f, "{t} unknown (expected command)"),
            Self::InvalidNumber { field, token } => write!(f, "invalid {field} '{token}'"),
            Self::InvalidName(e) => write!(f, "invalid device name: {e}"),
        }
    }
}

impl From<NameError> for RequestError {
    fn from(e: NameError) -> Self {
        Self::InvalidName(e)
    }
}

/// Sequential reader over a token slice.
#[derive(Debug, Clone)]
pub struct TokenCursor<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [String]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Consume the next token, if any.
    pub fn next_token(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token.as_str())
    }

    /// Consume the next token or fail naming the missing `field`.
    pub fn expect(&mut self, field: &'static str) -> Result<&'a str, RequestError> {
        self.next_token().ok_or(RequestError::MissingField(field))
    }

    /// Consume and parse a base-10 operand.
    pub fn expect_number<T: core::str::FromStr>(
        &mut self,
        field: &'static str,
    ) -> Result<T, RequestError> {
        let token = self.expect(field)?;
        token.parse().map_err(|_| RequestError::InvalidNumber {
            field,
            token: token.to_string(),
        })
    }

    /// Tokens not yet consumed.
    pub fn remaining(&self) -> &'a [String] {
        &self.tokens[self.pos..]
    }
}

/// A request whose header has been resolved.
#[derive(Debug, Clone)]
pub struct Request<'a> {
    pub bus: Bus,
    pub command: Command,
    pub operands: TokenCursor<'a>,
}

impl<'a> Request<'a> {
    /// Resolve the header of `tokens`.
    ///
    /// Returns `Ok(None)` when the request is addressed to another device;
    /// that is filtering, not an error.
    pub fn parse(
        tokens: &'a [String],
        variant: Variant,
        identity: &str,
    ) -> Result<Option<Self>, RequestError> {
        if tokens.is_empty() {
            return Err(RequestError::Empty);
        }
        let mut cursor = TokenCursor::new(tokens);

        if variant.is_addressed() {
            let destination = cursor.expect("destination")?;
            if destination != identity && destination != BROADCAST_NAME {
                return Ok(None);
            }
        }

        let bus_token = cursor.expect("bus")?;
        let bus =
            Bus::parse(bus_token).ok_or_else(|| RequestError::UnknownBus(bus_token.to_string()))?;

        let cmd_token = cursor.expect("command")?;
        let command = Command::parse(cmd_token)
            .ok_or_else(|| RequestError::UnknownCommand(cmd_token.to_string()))?;

        Ok(Some(Self {
            bus,
            command,
            operands: cursor,
        }))
    }
}
