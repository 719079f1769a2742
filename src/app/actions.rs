//! Peripheral actions resolved from a request.
//!
//! Only the (bus, command) pairs below have a defined meaning. Every other
//! combination, and GPIO writes to unknown ports, resolve to no action.
//!
//! | Bus  | Command | Operands                   | Action            |
//! |------|---------|----------------------------|-------------------|
//! | I2C  | INIT    | none                       | `I2cInit`         |
//! | I2C  | RELEASE | none                       | `I2cRelease`      |
//! | I2C  | WRITE   | address, data              | `I2cWrite`        |
//! | I2C  | READ    | address                    | `I2cRead`         |
//! | GPIO | WRITE   | port, value                | `GpioWrite`       |
//! | CORE | WRITE   | `DEVICE_NAME`, name        | `SetDeviceName`   |

use log::debug;

use crate::protocol::command::{Bus, Command, Pin};
use crate::protocol::name::{DeviceName, parse_name};
use crate::protocol::request::{Request, RequestError};
use crate::protocol::DEVICE_NAME_FIELD;

/// Highest 7-bit I2C address.
pub const I2C_ADDRESS_MAX: u8 = 0x7F;

/// A side effect the dispatcher will carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    I2cInit,
    I2cRelease,
    I2cWrite { address: u8, value: u8 },
    I2cRead { address: u8 },
    GpioWrite { pin: Pin, high: bool },
    SetDeviceName(DeviceName),
}

impl Action {
    /// Resolve `request` into an action.
    ///
    /// `Ok(None)` means the request is well-formed but has no effect.
    pub fn from_request(request: Request<'_>) -> Result<Option<Self>, RequestError> {
        let Request {
            bus,
            command,
            mut operands,
        } = request;

        let action = match (bus, command) {
            (Bus::I2c, Command::Init) => Self::I2cInit,
            (Bus::I2c, Command::Release) => Self::I2cRelease,
            (Bus::I2c, Command::Write) => {
                let address = i2c_address(operands.expect("address")?)?;
                let value = operands.expect_number("data")?;
                Self::I2cWrite { address, value }
            }
            (Bus::I2c, Command::Read) => Self::I2cRead {
                address: i2c_address(operands.expect("address")?)?,
            },
            (Bus::Gpio, Command::Write) => {
                let port = operands.expect("port")?;
                let Some(pin) = Pin::parse(port) else {
                    debug!("GPIO port {} unknown, ignored", port);
                    return Ok(None);
                };
                let level: i64 = operands.expect_number("value")?;
                Self::GpioWrite {
                    pin,
                    high: level != 0,
                }
            }
            (Bus::Core, Command::Write) => {
                let field = operands.expect("field")?;
                if field != DEVICE_NAME_FIELD {
                    debug!("CORE field {} unknown, ignored", field);
                    return Ok(None);
                }
                Self::SetDeviceName(parse_name(operands.expect("device name")?)?)
            }
            _ => {
                debug!("{}/{} has no action", bus, command);
                return Ok(None);
            }
        };

        let extra = operands.remaining();
        if !extra.is_empty() {
            // Burst transfers are not supported; only the first data byte is used.
            debug!("{}/{}: ignoring {} extra operand(s)", bus, command, extra.len());
        }

        Ok(Some(action))
    }
}

fn i2c_address(token: &str) -> Result<u8, RequestError> {
    match token.parse::<u8>() {
        Ok(address) if address <= I2C_ADDRESS_MAX => Ok(address),
        _ => Err(RequestError::InvalidNumber {
            field: "address",
            token: token.to_string(),
        }),
    }
}
