//! Wire protocol: pure parsing logic, zero I/O.
//!
//! Messages are ASCII strings of `/`-separated fields:
//!
//! ```text
//!  UDP:  <device_name|All>/<BUS>/<COMMAND>[/<address>][/<data>...]
//!  TCP:                    <BUS>/<COMMAND>[/<address>][/<data>...]
//!
//!  "Clicker/I2C/WRITE/12/0"
//!     │      │    │    │  └─ data     (base 10)
//!     │      │    │    └──── address  (base 10)
//!     │      │    └───────── command  INIT | RELEASE | WRITE | READ
//!     │      └────────────── bus      I2C | SPI | GPIO | UART | CORE
//!     └───────────────────── destination (UDP only)
//! ```
//!
//! The [`tokenizer`] splits, [`request`] resolves the header fields, and
//! [`variant`] holds every literal that differs between the UDP and TCP
//! dialects.

pub mod command;
pub mod name;
pub mod request;
pub mod tokenizer;
pub mod variant;

/// Field separator.
pub const DELIMITER: char = '/';

/// Largest inbound or outbound message, in bytes.
pub const MAX_MESSAGE_LEN: usize = 1024;

/// Name a device takes when its persisted record is unset.
pub const DEFAULT_DEVICE_NAME: &str = "Clicker";

/// Destination that every device accepts.
pub const BROADCAST_NAME: &str = "All";

/// Name the server uses for itself in greetings.
pub const SERVER_NAME: &str = "Server";

/// Longest device name the persisted record can hold.
pub const MAX_NAME_LEN: usize = 254;

/// CORE WRITE field that selects the device name.
pub const DEVICE_NAME_FIELD: &str = "DEVICE_NAME";

/// Handshake keyword.
pub const HELLO: &str = "HELLO";
