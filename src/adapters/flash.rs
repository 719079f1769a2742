//! Flash storage adapter.
//!
//! Implements [`StoragePort`] over a small byte region. The region is
//! mirrored in RAM; on ESP-IDF every write also commits the whole region
//! as a single NVS blob, which NVS applies atomically.
//!
//! The simulation backend starts out fully erased (`0xFF`), like a fresh
//! flash page.

use log::info;
#[cfg(feature = "espidf")]
use log::warn;

use crate::app::identity::RECORD_SIZE;
use crate::app::ports::{StorageError, StoragePort};

#[cfg(feature = "espidf")]
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};

const ERASED: u8 = 0xFF;

#[cfg(feature = "espidf")]
const NAMESPACE: &str = "clicker";
#[cfg(feature = "espidf")]
const REGION_KEY: &str = "region";

/// Size of the emulated flash region.
pub const REGION_SIZE: usize = RECORD_SIZE;

pub struct FlashAdapter {
    image: Vec<u8>,
    #[cfg(feature = "espidf")]
    nvs: EspNvs<NvsDefault>,
}

#[cfg(not(feature = "espidf"))]
impl FlashAdapter {
    /// An erased region.
    pub fn new() -> Self {
        info!("FlashAdapter: simulation backend");
        Self {
            image: vec![ERASED; REGION_SIZE],
        }
    }

    /// A region pre-loaded with `contents`, padded with erased bytes.
    pub fn from_image(contents: &[u8]) -> Self {
        let mut image = vec![ERASED; REGION_SIZE.max(contents.len())];
        image[..contents.len()].copy_from_slice(contents);
        Self { image }
    }
}

#[cfg(not(feature = "espidf"))]
impl Default for FlashAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "espidf")]
impl FlashAdapter {
    /// Open the NVS namespace and load the region.
    ///
    /// A missing blob reads back as erased flash.
    pub fn new(partition: EspDefaultNvsPartition) -> Result<Self, StorageError> {
        let nvs = EspNvs::new(partition, NAMESPACE, true).map_err(|e| {
            warn!("NVS open '{}' failed: {}", NAMESPACE, e);
            StorageError::IoError
        })?;

        let mut image = vec![ERASED; REGION_SIZE];
        let mut buf = [0u8; REGION_SIZE];
        match nvs.get_raw(REGION_KEY, &mut buf) {
            Ok(Some(stored)) => {
                let n = stored.len().min(REGION_SIZE);
                image[..n].copy_from_slice(&stored[..n]);
                info!("FlashAdapter: loaded {} byte region", n);
            }
            Ok(None) => info!("FlashAdapter: region not found, starting erased"),
            Err(e) => {
                warn!("NVS read '{}' failed: {}", REGION_KEY, e);
                return Err(StorageError::IoError);
            }
        }

        Ok(Self { image, nvs })
    }
}

impl FlashAdapter {
    /// Current region contents.
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    #[cfg(feature = "espidf")]
    fn commit(&mut self, image: &[u8]) -> Result<(), StorageError> {
        self.nvs.set_raw(REGION_KEY, image).map_err(|e| {
            warn!("NVS write '{}' failed: {}", REGION_KEY, e);
            StorageError::IoError
        })?;
        Ok(())
    }

    #[cfg(not(feature = "espidf"))]
    fn commit(&mut self, _image: &[u8]) -> Result<(), StorageError> {
        Ok(())
    }
}

impl StoragePort for FlashAdapter {
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<usize, StorageError> {
        let available = self.image.get(offset..).ok_or(StorageError::OutOfRange)?;
        let n = buf.len().min(available.len());
        buf[..n].copy_from_slice(&available[..n]);
        Ok(n)
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        let end = offset
            .checked_add(data.len())
            .filter(|&end| end <= self.image.len())
            .ok_or(StorageError::OutOfRange)?;

        // Stage the new image so a failed commit leaves the mirror intact.
        let mut staged = self.image.clone();
        staged[offset..end].copy_from_slice(data);
        self.commit(&staged)?;
        self.image = staged;
        Ok(())
    }
}
