//! Connection handshake.
//!
//! ```text
//!                 greeting sent
//!   ┌──────────────┐   echo matches   ┌─────────┐
//!   │ AwaitingEcho │ ───────────────▶ │ Running │
//!   └──────────────┘                  └─────────┘
//!      │      ▲
//!      │      │ UDP: anything else is dropped
//!      │      └──────────────
//!      │ TCP: anything else
//!      ▼
//!   ┌──────────┐
//!   │ Rejected │  (terminal, dispatch never starts)
//!   └──────────┘
//! ```

use log::{debug, info, warn};

use crate::protocol::variant::Variant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    AwaitingEcho,
    Running,
    Rejected,
}

/// One-shot greeting/echo exchange.
#[derive(Debug, Clone)]
pub struct Handshake {
    variant: Variant,
    greeting: String,
    expected: String,
    state: HandshakeState,
}

impl Handshake {
    pub fn new(variant: Variant, name: &str) -> Self {
        Self {
            variant,
            greeting: variant.greeting(name),
            expected: variant.expected_echo(name),
            state: HandshakeState::AwaitingEcho,
        }
    }

    /// Message to send once the link is up.
    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    /// Message the server must answer with.
    pub fn expected_echo(&self) -> &str {
        &self.expected
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// Feed one inbound message and return the resulting state.
    pub fn on_message(&mut self, message: &[u8]) -> HandshakeState {
        if self.state != HandshakeState::AwaitingEcho {
            return self.state;
        }

        if message == self.expected.as_bytes() {
            info!("Handshake complete ({})", self.variant);
            self.state = HandshakeState::Running;
        } else {
            match self.variant {
                Variant::Udp => {
                    debug!("Handshake: dropping {} byte message", message.len());
                }
                Variant::Tcp => {
                    warn!(
                        "Handshake: expected \"{}\", got \"{}\"",
                        self.expected,
                        String::from_utf8_lossy(message)
                    );
                    self.state = HandshakeState::Rejected;
                }
            }
        }
        self.state
    }
}
