//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to                      |
//! |------------|--------------------|----------------------------------|
//! | `flash`    | StoragePort        | NVS blob / in-memory image       |
//! | `hal`      | I2cPort, GpioPort  | any `embedded-hal` 1.0 I2C + pins|
//! | `log_sink` | EventSink          | Serial log output                |
//! | `udp`      | Transport          | UDP socket, one message/datagram |
//! | `tcp`      | Transport          | TCP stream, newline framed       |
//! | `channel`  | Transport          | `embassy-sync` channels          |

pub mod channel;
pub mod flash;
pub mod hal;
pub mod log_sink;
pub mod tcp;
pub mod udp;
