//! Command model: the fixed bus, command and pin vocabularies.
//!
//! Lookups are exact, case-sensitive string matches. An unknown token
//! yields `None`; the caller turns that into a malformed-request error.

use core::fmt;

/// Logical peripheral interface addressed by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bus {
    I2c,
    Spi,
    Gpio,
    Uart,
    /// Virtual bus for device self-management.
    Core,
}

impl Bus {
    pub const ALL: [Bus; 5] = [Self::I2c, Self::Spi, Self::Gpio, Self::Uart, Self::Core];

    /// Resolve a wire token.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "I2C" => Some(Self::I2c),
            "SPI" => Some(Self::Spi),
            "GPIO" => Some(Self::Gpio),
            "UART" => Some(Self::Uart),
            "CORE" => Some(Self::Core),
            _ => None,
        }
    }

    /// Wire token for this bus.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::I2c => "I2C",
            Self::Spi => "SPI",
            Self::Gpio => "GPIO",
            Self::Uart => "UART",
            Self::Core => "CORE",
        }
    }
}

impl fmt::Display for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation applied to a [`Bus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Init,
    Release,
    Write,
    Read,
}

impl Command {
    pub const ALL: [Command; 4] = [Self::Init, Self::Release, Self::Write, Self::Read];

    /// Resolve a wire token.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "INIT" => Some(Self::Init),
            "RELEASE" => Some(Self::Release),
            "WRITE" => Some(Self::Write),
            "READ" => Some(Self::Read),
            _ => None,
        }
    }

    /// Wire token for this command.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::Release => "RELEASE",
            Self::Write => "WRITE",
            Self::Read => "READ",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical output pins reachable through GPIO WRITE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pin {
    Led1,
    Led2,
}

impl Pin {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "LED1" => Some(Self::Led1),
            "LED2" => Some(Self::Led2),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Led1 => "LED1",
            Self::Led2 => "LED2",
        }
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
