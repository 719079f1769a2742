//! Link configuration parameters
//!
//! Where the server lives, which dialect it speaks, and how the binary
//! behaves around a session. Values can be overridden at build time with
//! a JSON document (see [`LinkConfig::from_json`]).

use core::fmt;
use core::net::{IpAddr, SocketAddr};
use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::protocol::variant::{ReplyTag, Variant};

/// Core link configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    // --- Dialect ---
    /// UDP (addressed, 6LoWPAN) or TCP (one connection per device)
    pub variant: Variant,
    /// Use the misspelled `RELPY` tag on TCP read replies
    pub legacy_reply_tag: bool,

    // --- Endpoints ---
    /// Server IP address (IPv6 or IPv4 literal)
    pub server_addr: String,
    /// Server port
    pub server_port: u16,
    /// Local port (UDP only)
    pub client_port: u16,

    // --- Timing ---
    /// Inbound silence after which a TCP link is reported timed out (0 = never)
    pub idle_timeout_secs: u32,
    /// Delay before the binary starts a new session (milliseconds)
    pub reconnect_delay_ms: u32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Udp,
            legacy_reply_tag: false,

            server_addr: "2001:1418:100::1".to_string(),
            server_port: 3000,
            client_port: 3001,

            idle_timeout_secs: 0,
            reconnect_delay_ms: 5000,
        }
    }
}

/// Why a [`LinkConfig`] was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The document did not parse.
    Malformed,
    /// A field failed validation. Describes which and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed config document"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl LinkConfig {
    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server_port == 0 {
            return Err(ConfigError::ValidationFailed("server_port must be non-zero"));
        }
        if self.variant == Variant::Udp {
            if self.client_port == 0 {
                return Err(ConfigError::ValidationFailed("client_port must be non-zero"));
            }
            if self.client_port == self.server_port {
                return Err(ConfigError::ValidationFailed(
                    "client_port must differ from server_port",
                ));
            }
        }
        if self.server_addr.parse::<IpAddr>().is_err() {
            return Err(ConfigError::ValidationFailed(
                "server_addr must be an IP address literal",
            ));
        }
        Ok(())
    }

    /// Resolved server endpoint.
    pub fn server_endpoint(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.server_addr.parse().map_err(|_| {
            ConfigError::ValidationFailed("server_addr must be an IP address literal")
        })?;
        Ok(SocketAddr::new(ip, self.server_port))
    }

    pub fn reply_tag(&self) -> ReplyTag {
        if self.legacy_reply_tag {
            ReplyTag::Legacy
        } else {
            ReplyTag::Reply
        }
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0).then(|| Duration::from_secs(self.idle_timeout_secs.into()))
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms.into())
    }
}
