//! Mock adapters for integration tests.
//!
//! Record every peripheral, flash and transport call so tests can assert
//! on the full history without touching real hardware or sockets.

use std::collections::VecDeque;

use clickerlink::app::events::AppEvent;
use clickerlink::app::identity::RECORD_SIZE;
use clickerlink::app::ports::{
    EventSink, GpioPort, I2cPort, PeripheralError, StorageError, StoragePort,
};
use clickerlink::link::transport::{
    CloseReason, Message, Transport, TransportError, TransportEvent,
};
use clickerlink::protocol::command::Pin;

// ── Peripheral call record ────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HwCall {
    I2cInit,
    I2cRelease,
    I2cWrite { address: u8, value: u8 },
    I2cRead { address: u8 },
    Gpio { pin: Pin, high: bool },
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<HwCall>,
    /// Byte returned by every I2C read.
    pub read_value: u8,
    /// Make every I2C transfer fail.
    pub fail_bus: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            read_value: 0,
            fail_bus: false,
        }
    }

    pub fn gpio_calls(&self) -> Vec<(Pin, bool)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Gpio { pin, high } => Some((*pin, *high)),
                _ => None,
            })
            .collect()
    }

    pub fn i2c_calls(&self) -> Vec<HwCall> {
        self.calls
            .iter()
            .filter(|c| !matches!(c, HwCall::Gpio { .. }))
            .cloned()
            .collect()
    }
}

impl I2cPort for MockHardware {
    fn init(&mut self) -> Result<(), PeripheralError> {
        self.calls.push(HwCall::I2cInit);
        Ok(())
    }

    fn release(&mut self) -> Result<(), PeripheralError> {
        self.calls.push(HwCall::I2cRelease);
        Ok(())
    }

    fn write_byte(&mut self, address: u8, value: u8) -> Result<(), PeripheralError> {
        self.calls.push(HwCall::I2cWrite { address, value });
        if self.fail_bus {
            return Err(PeripheralError::Bus);
        }
        Ok(())
    }

    fn read_byte(&mut self, address: u8) -> Result<u8, PeripheralError> {
        self.calls.push(HwCall::I2cRead { address });
        if self.fail_bus {
            return Err(PeripheralError::Bus);
        }
        Ok(self.read_value)
    }
}

impl GpioPort for MockHardware {
    fn set(&mut self, pin: Pin, high: bool) -> Result<(), PeripheralError> {
        self.calls.push(HwCall::Gpio { pin, high });
        Ok(())
    }
}

// ── MockFlash ─────────────────────────────────────────────────

/// Erased-on-creation flash that logs every write.
pub struct MockFlash {
    pub image: Vec<u8>,
    pub writes: Vec<(usize, Vec<u8>)>,
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl MockFlash {
    pub fn new() -> Self {
        Self {
            image: vec![0xFF; RECORD_SIZE],
            writes: Vec::new(),
            fail_writes: false,
        }
    }

    /// Flash already holding a name record.
    pub fn with_name(name: &str) -> Self {
        let mut flash = Self::new();
        flash.image[0] = name.len() as u8;
        flash.image[1..=name.len()].copy_from_slice(name.as_bytes());
        flash
    }
}

impl StoragePort for MockFlash {
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<usize, StorageError> {
        let src = self.image.get(offset..).ok_or(StorageError::OutOfRange)?;
        let n = buf.len().min(src.len());
        buf[..n].copy_from_slice(&src[..n]);
        Ok(n)
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::IoError);
        }
        let end = offset + data.len();
        if end > self.image.len() {
            return Err(StorageError::OutOfRange);
        }
        self.image[offset..end].copy_from_slice(data);
        self.writes.push((offset, data.to_vec()));
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── ScriptedTransport ─────────────────────────────────────────

/// Plays back a fixed event script. Once the script runs out the link
/// reports `Aborted`, so a session never hangs in a test.
pub struct ScriptedTransport {
    inbound: VecDeque<TransportEvent>,
    pub sent: Vec<String>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new(script: impl IntoIterator<Item = TransportEvent>) -> Self {
        Self {
            inbound: script.into_iter().collect(),
            sent: Vec::new(),
        }
    }
}

impl Transport for ScriptedTransport {
    async fn next_event(&mut self) -> Result<TransportEvent, TransportError> {
        Ok(self
            .inbound
            .pop_front()
            .unwrap_or(TransportEvent::Closed(CloseReason::Aborted)))
    }

    async fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.sent.push(String::from_utf8_lossy(data).into_owned());
        Ok(())
    }
}

/// Inbound message event from a string literal.
pub fn msg(text: &str) -> TransportEvent {
    TransportEvent::Message(Message::from_slice(text.as_bytes()).unwrap())
}
