//! Peripheral adapter over `embedded-hal` 1.0 traits.
//!
//! Bridges any I2C master and two output pins to [`I2cPort`] and
//! [`GpioPort`]. On ESP-IDF these are `esp-idf-hal` drivers; in tests they
//! are plain fakes. The adapter tracks whether the bus is initialised so
//! transfers after `I2C/RELEASE` fail the way they would on the real
//! controller.

use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::{Error as _, I2c};
use log::{debug, warn};

use crate::app::ports::{GpioPort, I2cPort, PeripheralError};
use crate::protocol::command::Pin;

pub struct HalPeripherals<I, L1, L2> {
    i2c: I,
    led1: L1,
    led2: L2,
    i2c_enabled: bool,
}

impl<I, L1, L2> HalPeripherals<I, L1, L2>
where
    I: I2c,
    L1: OutputPin,
    L2: OutputPin,
{
    /// The bus starts released; the server brings it up with `I2C/INIT`.
    pub fn new(i2c: I, led1: L1, led2: L2) -> Self {
        Self {
            i2c,
            led1,
            led2,
            i2c_enabled: false,
        }
    }

    pub fn is_i2c_enabled(&self) -> bool {
        self.i2c_enabled
    }

    /// Give back the wrapped drivers.
    pub fn into_parts(self) -> (I, L1, L2) {
        (self.i2c, self.led1, self.led2)
    }

    fn ensure_enabled(&self) -> Result<(), PeripheralError> {
        if self.i2c_enabled {
            Ok(())
        } else {
            warn!("I2C: bus not initialised");
            Err(PeripheralError::NotInitialised)
        }
    }
}

impl<I, L1, L2> I2cPort for HalPeripherals<I, L1, L2>
where
    I: I2c,
    L1: OutputPin,
    L2: OutputPin,
{
    fn init(&mut self) -> Result<(), PeripheralError> {
        debug!("I2C: init");
        self.i2c_enabled = true;
        Ok(())
    }

    fn release(&mut self) -> Result<(), PeripheralError> {
        debug!("I2C: release");
        self.i2c_enabled = false;
        Ok(())
    }

    fn write_byte(&mut self, address: u8, value: u8) -> Result<(), PeripheralError> {
        self.ensure_enabled()?;
        self.i2c.write(address, &[value]).map_err(|e| {
            warn!("I2C write @0x{:02x}: {:?}", address, e.kind());
            PeripheralError::Bus
        })
    }

    fn read_byte(&mut self, address: u8) -> Result<u8, PeripheralError> {
        self.ensure_enabled()?;
        let mut buf = [0u8; 1];
        self.i2c.read(address, &mut buf).map_err(|e| {
            warn!("I2C read @0x{:02x}: {:?}", address, e.kind());
            PeripheralError::Bus
        })?;
        Ok(buf[0])
    }
}

impl<I, L1, L2> GpioPort for HalPeripherals<I, L1, L2>
where
    I: I2c,
    L1: OutputPin,
    L2: OutputPin,
{
    fn set(&mut self, pin: Pin, high: bool) -> Result<(), PeripheralError> {
        let result = match pin {
            Pin::Led1 => drive(&mut self.led1, high),
            Pin::Led2 => drive(&mut self.led2, high),
        };
        result.map_err(|kind| {
            warn!("GPIO {}: {:?}", pin, kind);
            PeripheralError::Pin
        })
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), embedded_hal::digital::ErrorKind> {
    use embedded_hal::digital::Error as _;
    let result = if high { pin.set_high() } else { pin.set_low() };
    result.map_err(|e| e.kind())
}
