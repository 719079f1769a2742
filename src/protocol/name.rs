//! Device names as they appear on the wire and in flash.

use core::fmt;

use super::{BROADCAST_NAME, DELIMITER, MAX_NAME_LEN, SERVER_NAME};

/// A validated device name (1–254 bytes, no delimiter, not reserved).
pub type DeviceName = heapless::String<MAX_NAME_LEN>;

/// Why a candidate name was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    Empty,
    TooLong(usize),
    /// `All` and `Server` are addressing keywords.
    Reserved,
    ContainsDelimiter,
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "name is empty"),
            Self::TooLong(len) => write!(f, "name is {len} bytes (max {MAX_NAME_LEN})"),
            Self::Reserved => write!(f, "name is reserved"),
            Self::ContainsDelimiter => write!(f, "name contains '{DELIMITER}'"),
        }
    }
}

/// Validate `candidate` and copy it into a [`DeviceName`].
pub fn parse_name(candidate: &str) -> Result<DeviceName, NameError> {
    if candidate.is_empty() {
        return Err(NameError::Empty);
    }
    if candidate.len() > MAX_NAME_LEN {
        return Err(NameError::TooLong(candidate.len()));
    }
    if candidate.contains(DELIMITER) {
        return Err(NameError::ContainsDelimiter);
    }
    if candidate == BROADCAST_NAME || candidate == SERVER_NAME {
        return Err(NameError::Reserved);
    }
    DeviceName::try_from(candidate).map_err(|()| NameError::TooLong(candidate.len()))
}
