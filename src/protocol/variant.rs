//! Transport dialects.
//!
//! The UDP and TCP firmwares share the tokenizer and dispatcher; only the
//! literals below differ.
//!
//! | Literal         | UDP                    | TCP                  |
//! |-----------------|------------------------|----------------------|
//! | greeting        | `Server/HELLO/<name>`  | `HELLO/<name>`       |
//! | expected echo   | `<name>/HELLO`         | `HELLO`              |
//! | destination     | first field            | none (one link = one device) |
//! | I2C READ reply  | `<value>`              | `REPLY/<value>`      |

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{DELIMITER, HELLO, SERVER_NAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Datagram link (6LoWPAN). Requests carry a destination prefix.
    #[default]
    Udp,
    /// Stream link. One connection addresses exactly one device.
    Tcp,
}

/// Tag that prefixes TCP read replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyTag {
    #[default]
    Reply,
    /// The misspelled `RELPY` tag older servers match on.
    Legacy,
}

impl ReplyTag {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reply => "REPLY",
            Self::Legacy => "RELPY",
        }
    }
}

impl Variant {
    /// Whether requests start with a destination-name field.
    pub const fn is_addressed(self) -> bool {
        matches!(self, Self::Udp)
    }

    /// Greeting sent once the link is up.
    pub fn greeting(self, name: &str) -> String {
        match self {
            Self::Udp => format!("{SERVER_NAME}{DELIMITER}{HELLO}{DELIMITER}{name}"),
            Self::Tcp => format!("{HELLO}{DELIMITER}{name}"),
        }
    }

    /// Message the server must answer the greeting with.
    pub fn expected_echo(self, name: &str) -> String {
        match self {
            Self::Udp => format!("{name}{DELIMITER}{HELLO}"),
            Self::Tcp => HELLO.to_string(),
        }
    }

    /// Reply payload for a completed I2C READ.
    pub fn read_reply(self, value: u8, tag: ReplyTag) -> String {
        match self {
            Self::Udp => value.to_string(),
            Self::Tcp => format!("{}{DELIMITER}{value}", tag.as_str()),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Udp => f.write_str("udp"),
            Self::Tcp => f.write_str("tcp"),
        }
    }
}
