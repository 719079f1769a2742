//! Device identity store.
//!
//! The device name lives in a single record at offset 0 of flash:
//!
//! ```text
//! ┌──────────┬─────────────────────────┐
//! │ len (1B) │ name bytes (len B)      │
//! └──────────┴─────────────────────────┘
//! ```
//!
//! A length byte of `0` (never written) or `0xFF` (erased flash) means
//! "unset": the default name is adopted and written back immediately so
//! the next boot takes the fast path.

use log::{info, warn};

use crate::protocol::name::{DeviceName, parse_name};
use crate::protocol::{DEFAULT_DEVICE_NAME, MAX_NAME_LEN};

use super::ports::{StorageError, StoragePort};

/// Flash offset of the identity record.
pub const RECORD_OFFSET: usize = 0;

/// Bytes read when loading (length byte + longest name + slack).
pub const RECORD_SIZE: usize = 256;

const UNSET_ERASED: u8 = 0xFF;
const UNSET_ZERO: u8 = 0x00;

/// The in-memory device name, mirrored to flash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    name: DeviceName,
}

impl Identity {
    /// Load the persisted name, initialising the record if it is unset.
    pub fn load(storage: &mut impl StoragePort) -> Result<Self, StorageError> {
        let mut record = [0u8; RECORD_SIZE];
        let read = storage.read(RECORD_OFFSET, &mut record)?;

        match decode_record(&record[..read]) {
            Some(name) => {
                info!("Device name: {}", name);
                Ok(Self { name })
            }
            None => {
                info!(
                    "No device name set, setting device name to \"{}\"",
                    DEFAULT_DEVICE_NAME
                );
                let identity = Self::fallback();
                store(storage, &identity.name)?;
                Ok(identity)
            }
        }
    }

    /// The default identity, without touching storage.
    pub fn fallback() -> Self {
        const _: () =
            assert!(!DEFAULT_DEVICE_NAME.is_empty() && DEFAULT_DEVICE_NAME.len() <= MAX_NAME_LEN);
        Self {
            name: DeviceName::try_from(DEFAULT_DEVICE_NAME).unwrap_or_default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Persist `name` and then adopt it.
    ///
    /// On a storage error the previous name stays in effect.
    pub fn replace(
        &mut self,
        name: DeviceName,
        storage: &mut impl StoragePort,
    ) -> Result<DeviceName, StorageError> {
        store(storage, &name)?;
        Ok(core::mem::replace(&mut self.name, name))
    }
}

/// Overwrite the identity record with `name` in a single write.
///
/// `name` must pass [`parse_name`]; anything else would be unreadable (or
/// read back as unset) and is refused with [`StorageError::InvalidData`]
/// before flash is touched.
pub fn store(storage: &mut impl StoragePort, name: &str) -> Result<(), StorageError> {
    let name = parse_name(name).map_err(|e| {
        warn!("Refusing to store device name: {}", e);
        StorageError::InvalidData
    })?;
    let bytes = name.as_bytes();

    let mut record = [0u8; RECORD_SIZE];
    record[0] = bytes.len() as u8;
    record[1..=bytes.len()].copy_from_slice(bytes);
    storage.write(RECORD_OFFSET, &record[..=bytes.len()])
}

/// Decode a raw record. `None` means unset or unreadable.
fn decode_record(record: &[u8]) -> Option<DeviceName> {
    let (&len, rest) = record.split_first()?;
    if len == UNSET_ZERO || len == UNSET_ERASED {
        return None;
    }
    let Some(raw) = rest.get(..len as usize) else {
        warn!("Identity record truncated (len={}, have {})", len, rest.len());
        return None;
    };
    let Ok(text) = core::str::from_utf8(raw) else {
        warn!("Identity record is not UTF-8");
        return None;
    };
    match parse_name(text) {
        Ok(name) => Some(name),
        Err(e) => {
            warn!("Identity record rejected: {}", e);
            None
        }
    }
}
